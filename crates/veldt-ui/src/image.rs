//! Images and the image operation family.
//!
//! Image objects share the override-hook machinery with widgets: copy,
//! color-average, desaturate, label attachment, draw and uncache are
//! virtual calls with canonical implementations, re-entrancy guarded per
//! binding. No codecs live here; [`BitmapImage`] is an in-memory pixel
//! buffer and [`TiledImage`] replicates another image over an area.

use crate::base::WidgetBase;
use crate::draw::{DrawList, ImageId};
use crate::hook::{HookBinding, Vcall};
use std::any::Any;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use veldt_core::color::Color;
use veldt_core::geometry::{Pos, Rect, Size};

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

fn next_image_id() -> ImageId {
    ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed))
}

/// Base trait for image objects.
///
/// As with widgets, the trait methods are the canonical operations; callers
/// outside a canonical implementation go through [`dispatch`].
pub trait Image: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn hooks(&self) -> Option<&HookBinding<dyn ImageHook>> {
        None
    }

    /// A resized copy of the image.
    fn copy_sized(&self, width: i32, height: i32) -> Box<dyn Image>;

    /// Blend every pixel towards `color` (`weight` of the pixel remains).
    fn color_average(&mut self, color: Color, weight: f32);

    /// Convert to grayscale in place.
    fn desaturate(&mut self);

    /// Attach this image as `target`'s label: the widget's label now
    /// measures to the image extent.
    fn apply_label(&mut self, target: &mut WidgetBase) {
        target.clear_label();
        target.set_label_extent(Some(Size::new(self.width(), self.height())));
    }

    /// Paint into `area`, with `offset` shifting the source phase.
    fn draw(&mut self, list: &mut DrawList, area: Rect<i32>, offset: Pos<i32>);

    /// Drop any device-side cache. Canonically a no-op for in-memory images.
    fn uncache(&mut self) {}
}

/// Override hooks for the image operation family.
pub trait ImageHook {
    fn copy_sized(&self, image: &dyn Image, width: i32, height: i32) -> Box<dyn Image> {
        image.copy_sized(width, height)
    }

    fn color_average(&self, image: &mut dyn Image, color: Color, weight: f32) {
        image.color_average(color, weight);
    }

    fn desaturate(&self, image: &mut dyn Image) {
        image.desaturate();
    }

    fn apply_label(&self, image: &mut dyn Image, target: &mut WidgetBase) {
        image.apply_label(target);
    }

    fn draw(&self, image: &mut dyn Image, list: &mut DrawList, area: Rect<i32>, offset: Pos<i32>) {
        image.draw(list, area, offset);
    }

    fn uncache(&self, image: &mut dyn Image) {
        image.uncache();
    }
}

/// Hook-aware entry points for the image operation family.
pub mod dispatch {
    use super::*;

    pub fn copy_sized(image: &dyn Image, width: i32, height: i32) -> Box<dyn Image> {
        let Some(binding) = image.hooks().cloned() else {
            return image.copy_sized(width, height);
        };
        if binding.in_flight(Vcall::IMAGE_COPY) {
            return image.copy_sized(width, height);
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::IMAGE_COPY);
        hook.copy_sized(image, width, height)
    }

    pub fn color_average(image: &mut dyn Image, color: Color, weight: f32) {
        let Some(binding) = image.hooks().cloned() else {
            image.color_average(color, weight);
            return;
        };
        if binding.in_flight(Vcall::IMAGE_COLOR_AVERAGE) {
            image.color_average(color, weight);
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::IMAGE_COLOR_AVERAGE);
        hook.color_average(image, color, weight);
    }

    pub fn desaturate(image: &mut dyn Image) {
        let Some(binding) = image.hooks().cloned() else {
            image.desaturate();
            return;
        };
        if binding.in_flight(Vcall::IMAGE_DESATURATE) {
            image.desaturate();
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::IMAGE_DESATURATE);
        hook.desaturate(image);
    }

    pub fn apply_label(image: &mut dyn Image, target: &mut WidgetBase) {
        let Some(binding) = image.hooks().cloned() else {
            image.apply_label(target);
            return;
        };
        if binding.in_flight(Vcall::IMAGE_LABEL) {
            image.apply_label(target);
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::IMAGE_LABEL);
        hook.apply_label(image, target);
    }

    pub fn draw(image: &mut dyn Image, list: &mut DrawList, area: Rect<i32>, offset: Pos<i32>) {
        let Some(binding) = image.hooks().cloned() else {
            image.draw(list, area, offset);
            return;
        };
        if binding.in_flight(Vcall::IMAGE_DRAW) {
            image.draw(list, area, offset);
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::IMAGE_DRAW);
        hook.draw(image, list, area, offset);
    }

    pub fn uncache(image: &mut dyn Image) {
        let Some(binding) = image.hooks().cloned() else {
            image.uncache();
            return;
        };
        if binding.in_flight(Vcall::IMAGE_UNCACHE) {
            image.uncache();
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::IMAGE_UNCACHE);
        hook.uncache(image);
    }
}

/// An in-memory RGBA pixel buffer.
pub struct BitmapImage {
    id: ImageId,
    width: i32,
    height: i32,
    pixels: Vec<Color>,
    hooks: Option<HookBinding<dyn ImageHook>>,
}

impl BitmapImage {
    pub fn new(width: i32, height: i32, fill: Color) -> Self {
        let (width, height) = (width.max(0), height.max(0));
        Self {
            id: next_image_id(),
            width,
            height,
            pixels: vec![fill; (width * height) as usize],
            hooks: None,
        }
    }

    pub fn id(&self) -> ImageId {
        self.id
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) as usize;
        if let Some(p) = self.pixels.get_mut(i) {
            *p = color;
        }
    }

    pub fn set_hooks(&mut self, hook: Rc<dyn ImageHook>) {
        self.hooks = Some(HookBinding::new(hook));
    }
}

impl Image for BitmapImage {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn hooks(&self) -> Option<&HookBinding<dyn ImageHook>> {
        self.hooks.as_ref()
    }

    fn copy_sized(&self, width: i32, height: i32) -> Box<dyn Image> {
        let (width, height) = (width.max(0), height.max(0));
        let mut out = BitmapImage::new(width, height, Color::TRANSPARENT);
        // Nearest-neighbor resample.
        for y in 0..height {
            for x in 0..width {
                let sx = (x as i64 * self.width as i64 / width.max(1) as i64) as i32;
                let sy = (y as i64 * self.height as i64 / height.max(1) as i64) as i32;
                if let Some(c) = self.pixel(sx, sy) {
                    out.set_pixel(x, y, c);
                }
            }
        }
        Box::new(out)
    }

    fn color_average(&mut self, color: Color, weight: f32) {
        for p in &mut self.pixels {
            *p = p.average(color, weight);
        }
    }

    fn desaturate(&mut self) {
        for p in &mut self.pixels {
            *p = p.desaturate();
        }
    }

    fn draw(&mut self, list: &mut DrawList, area: Rect<i32>, offset: Pos<i32>) {
        let w = (self.width - offset.x).min(area.w);
        let h = (self.height - offset.y).min(area.h);
        list.image(self.id, Rect::new(area.x, area.y, w, h));
    }
}

/// An image that fills an area by repeating another image.
///
/// A stored width or height of zero means "tile whatever area the draw call
/// provides" instead of a fixed extent.
pub struct TiledImage {
    inner: Box<dyn Image>,
    width: i32,
    height: i32,
    hooks: Option<HookBinding<dyn ImageHook>>,
}

impl TiledImage {
    pub fn new(inner: Box<dyn Image>, width: i32, height: i32) -> Self {
        Self {
            inner,
            width: width.max(0),
            height: height.max(0),
            hooks: None,
        }
    }

    pub fn inner(&self) -> &dyn Image {
        self.inner.as_ref()
    }

    pub fn set_hooks(&mut self, hook: Rc<dyn ImageHook>) {
        self.hooks = Some(HookBinding::new(hook));
    }
}

impl Image for TiledImage {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn hooks(&self) -> Option<&HookBinding<dyn ImageHook>> {
        self.hooks.as_ref()
    }

    fn copy_sized(&self, width: i32, height: i32) -> Box<dyn Image> {
        let inner = dispatch::copy_sized(self.inner.as_ref(), self.inner.width(), self.inner.height());
        Box::new(TiledImage::new(inner, width, height))
    }

    fn color_average(&mut self, color: Color, weight: f32) {
        dispatch::color_average(self.inner.as_mut(), color, weight);
    }

    fn desaturate(&mut self) {
        dispatch::desaturate(self.inner.as_mut());
    }

    fn draw(&mut self, list: &mut DrawList, area: Rect<i32>, offset: Pos<i32>) {
        let (iw, ih) = (self.inner.width(), self.inner.height());
        if iw <= 0 || ih <= 0 {
            return;
        }
        let w = if self.width != 0 { self.width } else { area.w };
        let h = if self.height != 0 { self.height } else { area.h };
        if w <= 0 || h <= 0 {
            return;
        }
        list.push_clip(Rect::new(area.x, area.y, w, h));
        let mut x = area.x + offset.x;
        let mut y = area.y + offset.y;
        x -= x % iw;
        y -= y % ih;
        let x_end = x + w;
        let y_end = y + h;
        let mut yy = y;
        while yy < y_end {
            let mut xx = x;
            while xx < x_end {
                dispatch::draw(self.inner.as_mut(), list, Rect::new(xx, yy, iw, ih), Pos::new(0, 0));
                xx += iw;
            }
            yy += ih;
        }
        list.pop_clip();
    }

    fn uncache(&mut self) {
        dispatch::uncache(self.inner.as_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawCommand;

    #[test]
    fn test_bitmap_color_average() {
        let mut img = BitmapImage::new(2, 2, Color::WHITE);
        img.color_average(Color::BLACK, 0.5);
        let p = img.pixel(0, 0).unwrap();
        assert!((p.r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tiled_draw_covers_area() {
        let inner = Box::new(BitmapImage::new(10, 10, Color::RED));
        let mut tiled = TiledImage::new(inner, 0, 0);
        let mut list = DrawList::new();
        tiled.draw(&mut list, Rect::new(0, 0, 25, 25), Pos::new(0, 0));
        let tiles = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Image { .. }))
            .count();
        assert_eq!(tiles, 9);
        assert_eq!(list.clip_depth(), 0);
    }

    #[test]
    fn test_tiled_zero_size_uses_area_extent() {
        let inner = Box::new(BitmapImage::new(8, 8, Color::GREEN));
        let mut tiled = TiledImage::new(inner, 0, 0);
        let mut list = DrawList::new();
        tiled.draw(&mut list, Rect::new(4, 4, 8, 8), Pos::new(0, 0));
        match list.commands().first() {
            Some(DrawCommand::PushClip(clip)) => {
                assert_eq!(*clip, Rect::new(4, 4, 8, 8));
            }
            other => panic!("expected clip, got {other:?}"),
        }
    }

    #[test]
    fn test_tiled_empty_inner_is_noop() {
        let inner = Box::new(BitmapImage::new(0, 0, Color::RED));
        let mut tiled = TiledImage::new(inner, 0, 0);
        let mut list = DrawList::new();
        tiled.draw(&mut list, Rect::new(0, 0, 100, 100), Pos::new(0, 0));
        assert!(list.commands().is_empty());
    }
}
