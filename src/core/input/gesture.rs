//=========================================================================
// Gesture Capability Set
//=========================================================================
//
// Touch gestures a screen wants the input backend to recognize. The set
// of the topmost screen is forwarded to the backend whenever the stack
// changes; the core never interprets the flags itself.
//
//=========================================================================

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct GestureSet: u16 {
        const TAP             = 1 << 0;
        const DOUBLE_TAP      = 1 << 1;
        const HOLD            = 1 << 2;
        const HORIZONTAL_DRAG = 1 << 3;
        const VERTICAL_DRAG   = 1 << 4;
        const FREE_DRAG       = 1 << 5;
        const PINCH           = 1 << 6;
        const FLICK           = 1 << 7;
        const DRAG_COMPLETE   = 1 << 8;
        const PINCH_COMPLETE  = 1 << 9;
    }
}

impl GestureSet {
    /// Tap plus every drag flavour; what a scrollable menu needs.
    pub const MENU: Self = Self::TAP
        .union(Self::VERTICAL_DRAG)
        .union(Self::DRAG_COMPLETE);
}

//=========================================================================
// Unit Tests
//=========================================================================
