//! Override hooks and the virtual-call re-entrancy guard.
//!
//! A widget's virtual operations (draw, handle, resize, show, hide, plus the
//! list-item and image families) have canonical implementations on the
//! widget itself and may be intercepted by a hook object bound to the
//! widget. The hook can run the original implementation at any point, and
//! the original may itself re-enter the dispatcher; an in-flight bitmask on
//! the binding keeps each operation from looping:
//!
//! 1. No hook bound: the canonical method runs.
//! 2. The operation's bit is already set: this call is a re-entry from
//!    inside the hook, so the canonical method runs directly.
//! 3. Otherwise the bit is set for the duration of the hook call (a scoped
//!    guard clears it on every return path) and the hook runs. Any call the
//!    hook makes back into the dispatcher for the same operation lands in
//!    case 2.
//!
//! The net effect is that the canonical implementation executes exactly once
//! per external trigger, whether the trigger enters through the dispatcher
//! or through the hook side, and whether or not the hook chains to the
//! original.

use crate::base::Widget;
use crate::draw::DrawContext;
use crate::event::{Event, EventContext};
use bitflags::bitflags;
use static_assertions::const_assert_eq;
use std::cell::Cell;
use std::rc::Rc;
use veldt_core::geometry::Rect;

bitflags! {
    /// One bit per hookable virtual operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Vcall: u32 {
        // Widget operations
        const DRAW          = 1 << 0;
        const HANDLE        = 1 << 1;
        const RESIZE        = 1 << 2;
        const SHOW          = 1 << 3;
        const HIDE          = 1 << 4;
        const DRAW_OVERLAY  = 1 << 5;

        // List-item operations
        const ITEM_FIRST        = 1 << 6;
        const ITEM_NEXT         = 1 << 7;
        const ITEM_PREV         = 1 << 8;
        const ITEM_LAST         = 1 << 9;
        const ITEM_HEIGHT       = 1 << 10;
        const ITEM_WIDTH        = 1 << 11;
        const ITEM_QUICK_HEIGHT = 1 << 12;
        const ITEM_DRAW         = 1 << 13;
        const ITEM_TEXT         = 1 << 14;
        const ITEM_SWAP         = 1 << 15;
        const ITEM_AT           = 1 << 16;
        const FULL_WIDTH        = 1 << 17;
        const FULL_HEIGHT       = 1 << 18;
        const INCR_HEIGHT       = 1 << 19;
        const ITEM_SELECT       = 1 << 20;
        const ITEM_SELECTED     = 1 << 21;

        // Image operations
        const IMAGE_COPY          = 1 << 22;
        const IMAGE_COLOR_AVERAGE = 1 << 23;
        const IMAGE_DESATURATE    = 1 << 24;
        const IMAGE_LABEL         = 1 << 25;
        const IMAGE_DRAW          = 1 << 26;
        const IMAGE_UNCACHE       = 1 << 27;
    }
}

impl Vcall {
    pub const WIDGET_FAMILY: Self = Self::DRAW
        .union(Self::HANDLE)
        .union(Self::RESIZE)
        .union(Self::SHOW)
        .union(Self::HIDE)
        .union(Self::DRAW_OVERLAY);

    pub const LIST_FAMILY: Self = Self::ITEM_FIRST
        .union(Self::ITEM_NEXT)
        .union(Self::ITEM_PREV)
        .union(Self::ITEM_LAST)
        .union(Self::ITEM_HEIGHT)
        .union(Self::ITEM_WIDTH)
        .union(Self::ITEM_QUICK_HEIGHT)
        .union(Self::ITEM_DRAW)
        .union(Self::ITEM_TEXT)
        .union(Self::ITEM_SWAP)
        .union(Self::ITEM_AT)
        .union(Self::FULL_WIDTH)
        .union(Self::FULL_HEIGHT)
        .union(Self::INCR_HEIGHT)
        .union(Self::ITEM_SELECT)
        .union(Self::ITEM_SELECTED);

    pub const IMAGE_FAMILY: Self = Self::IMAGE_COPY
        .union(Self::IMAGE_COLOR_AVERAGE)
        .union(Self::IMAGE_DESATURATE)
        .union(Self::IMAGE_LABEL)
        .union(Self::IMAGE_DRAW)
        .union(Self::IMAGE_UNCACHE);
}

// The families share one mask word, so their bit ranges must not overlap.
const_assert_eq!(Vcall::WIDGET_FAMILY.bits() & Vcall::LIST_FAMILY.bits(), 0);
const_assert_eq!(Vcall::WIDGET_FAMILY.bits() & Vcall::IMAGE_FAMILY.bits(), 0);
const_assert_eq!(Vcall::LIST_FAMILY.bits() & Vcall::IMAGE_FAMILY.bits(), 0);

/// Pairs a hook object with the in-flight mask it shares with the hooked
/// object. Cloning a binding shares both, so a widget-family view and a
/// list-family view of the same hook observe the same mask.
pub struct HookBinding<H: ?Sized> {
    in_flight: Rc<Cell<u32>>,
    hook: Rc<H>,
}

impl<H: ?Sized> HookBinding<H> {
    pub fn new(hook: Rc<H>) -> Self {
        Self {
            in_flight: Rc::new(Cell::new(0)),
            hook,
        }
    }

    /// Build a binding that shares `mask` with another binding, for hook
    /// objects participating in more than one operation family.
    pub fn with_mask(hook: Rc<H>, mask: Rc<Cell<u32>>) -> Self {
        Self {
            in_flight: mask,
            hook,
        }
    }

    pub fn hook(&self) -> Rc<H> {
        Rc::clone(&self.hook)
    }

    pub fn mask(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.in_flight)
    }

    /// Whether `op` is currently executing through this binding.
    pub fn in_flight(&self, op: Vcall) -> bool {
        self.in_flight.get() & op.bits() != 0
    }

    /// Mark `op` in flight until the guard drops.
    pub fn acquire(&self, op: Vcall) -> VcallGuard {
        let mask = Rc::clone(&self.in_flight);
        mask.set(mask.get() | op.bits());
        VcallGuard { mask, bits: op.bits() }
    }
}

impl<H: ?Sized> Clone for HookBinding<H> {
    fn clone(&self) -> Self {
        Self {
            in_flight: Rc::clone(&self.in_flight),
            hook: Rc::clone(&self.hook),
        }
    }
}

/// Scoped ownership of one in-flight bit. Dropping the guard clears the bit,
/// so early returns and every other exit path release it.
pub struct VcallGuard {
    mask: Rc<Cell<u32>>,
    bits: u32,
}

impl Drop for VcallGuard {
    fn drop(&mut self) {
        self.mask.set(self.mask.get() & !self.bits);
    }
}

/// Override hooks for the widget operation family.
///
/// Each method defaults to running the canonical implementation, so a hook
/// overrides only the operations it cares about. Inside an override, call
/// the matching [`dispatch`] function to run the original; the in-flight bit
/// routes that call straight to the canonical method.
///
/// Hooks take `&self`; implementations needing state use interior
/// mutability.
pub trait WidgetHook {
    fn draw(&self, widget: &mut dyn Widget, ctx: &mut DrawContext<'_>) {
        widget.draw(ctx);
    }

    fn handle(&self, widget: &mut dyn Widget, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        widget.handle(event, ctx)
    }

    fn resize(&self, widget: &mut dyn Widget, bounds: Rect<i32>) {
        widget.resize(bounds);
    }

    fn show(&self, widget: &mut dyn Widget) {
        widget.show();
    }

    fn hide(&self, widget: &mut dyn Widget) {
        widget.hide();
    }

    fn draw_overlay(&self, widget: &mut dyn Widget, ctx: &mut DrawContext<'_>) {
        widget.draw_overlay(ctx);
    }
}

/// Hook-aware entry points for the widget operation family.
///
/// All code that is not itself a canonical implementation must call widgets
/// through these functions.
pub mod dispatch {
    use super::*;

    pub fn draw(widget: &mut dyn Widget, ctx: &mut DrawContext<'_>) {
        let Some(binding) = widget.base().hooks().cloned() else {
            widget.draw(ctx);
            return;
        };
        if binding.in_flight(Vcall::DRAW) {
            widget.draw(ctx);
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::DRAW);
        hook.draw(widget, ctx);
    }

    pub fn handle(widget: &mut dyn Widget, event: &Event, ctx: &mut EventContext<'_>) -> bool {
        let consumed = match widget.base().hooks().cloned() {
            None => widget.handle(event, ctx),
            Some(binding) => {
                if binding.in_flight(Vcall::HANDLE) {
                    widget.handle(event, ctx)
                } else {
                    let hook = binding.hook();
                    let _guard = binding.acquire(Vcall::HANDLE);
                    hook.handle(widget, event, ctx)
                }
            }
        };
        if consumed && matches!(event, Event::Push { .. }) {
            ctx.offer_pushed(widget.base().id());
        }
        consumed
    }

    pub fn resize(widget: &mut dyn Widget, bounds: Rect<i32>) {
        let Some(binding) = widget.base().hooks().cloned() else {
            widget.resize(bounds);
            return;
        };
        if binding.in_flight(Vcall::RESIZE) {
            widget.resize(bounds);
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::RESIZE);
        hook.resize(widget, bounds);
    }

    pub fn show(widget: &mut dyn Widget) {
        let Some(binding) = widget.base().hooks().cloned() else {
            widget.show();
            return;
        };
        if binding.in_flight(Vcall::SHOW) {
            widget.show();
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::SHOW);
        hook.show(widget);
    }

    pub fn hide(widget: &mut dyn Widget) {
        let Some(binding) = widget.base().hooks().cloned() else {
            widget.hide();
            return;
        };
        if binding.in_flight(Vcall::HIDE) {
            widget.hide();
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::HIDE);
        hook.hide(widget);
    }

    pub fn draw_overlay(widget: &mut dyn Widget, ctx: &mut DrawContext<'_>) {
        let Some(binding) = widget.base().hooks().cloned() else {
            widget.draw_overlay(ctx);
            return;
        };
        if binding.in_flight(Vcall::DRAW_OVERLAY) {
            widget.draw_overlay(ctx);
            return;
        }
        let hook = binding.hook();
        let _guard = binding.acquire(Vcall::DRAW_OVERLAY);
        hook.draw_overlay(widget, ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopHook;
    impl WidgetHook for NoopHook {}

    #[test]
    fn test_guard_clears_on_drop() {
        let binding: HookBinding<dyn WidgetHook> = HookBinding::new(Rc::new(NoopHook));
        assert!(!binding.in_flight(Vcall::DRAW));
        {
            let _g = binding.acquire(Vcall::DRAW);
            assert!(binding.in_flight(Vcall::DRAW));
            assert!(!binding.in_flight(Vcall::HANDLE));
        }
        assert!(!binding.in_flight(Vcall::DRAW));
    }

    #[test]
    fn test_guard_bits_independent() {
        let binding: HookBinding<dyn WidgetHook> = HookBinding::new(Rc::new(NoopHook));
        let _a = binding.acquire(Vcall::DRAW);
        {
            let _b = binding.acquire(Vcall::HANDLE);
            assert!(binding.in_flight(Vcall::DRAW));
            assert!(binding.in_flight(Vcall::HANDLE));
        }
        assert!(binding.in_flight(Vcall::DRAW));
        assert!(!binding.in_flight(Vcall::HANDLE));
    }

    #[test]
    fn test_clone_shares_mask() {
        let binding: HookBinding<dyn WidgetHook> = HookBinding::new(Rc::new(NoopHook));
        let view = binding.clone();
        let _g = binding.acquire(Vcall::SHOW);
        assert!(view.in_flight(Vcall::SHOW));
    }
}
