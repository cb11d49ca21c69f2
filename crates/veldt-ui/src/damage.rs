//! Damage flag tracking for widgets.
//!
//! Damage marks which aspects of a widget need repainting. A widget
//! accumulates damage as its state changes; its draw method consumes the
//! flags to choose between a full repaint and cheaper partial updates, then
//! clears them.

use bitflags::bitflags;

bitflags! {
    /// Damage flags accumulated on a widget between draws.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Damage: u8 {
        /// No pending redraw.
        const NONE    = 0;

        /// A band of the widget was exposed (e.g. a tab highlight changed);
        /// only decoration needs repainting, not children.
        const EXPOSE  = 1 << 0;

        /// Scrolled content moved.
        const SCROLL  = 1 << 1;

        /// The widget's value changed (slider position, selection).
        const VALUE   = 1 << 2;

        /// A child widget is damaged and needs to be repainted.
        const CHILD   = 1 << 3;

        /// Overlay content (windows only) needs repainting.
        const OVERLAY = 1 << 4;

        /// Everything: repaint the widget and all of its children.
        const ALL     = 1 << 7;
    }
}

impl Damage {
    /// Flags that repaint decoration without a full child redraw.
    pub const PARTIAL_GROUP: Self = Self::EXPOSE
        .union(Self::SCROLL)
        .union(Self::VALUE);

    /// Returns true if the whole widget (children included) must repaint.
    #[inline]
    pub fn needs_full_redraw(&self) -> bool {
        self.contains(Self::ALL)
    }

    /// Returns true if only decoration/value regions changed.
    #[inline]
    pub fn is_partial(&self) -> bool {
        !self.is_empty() && !self.contains(Self::ALL)
    }
}
