use bitflags::bitflags;
use glam::DVec2;

bitflags! {
    /// Logical buttons; the window layer maps physical keys onto these.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Buttons: u32 {
        // movement
        const FORWARD         = 1 << 0;
        const BACK            = 1 << 1;
        const LEFT            = 1 << 2;
        const RIGHT           = 1 << 3;
        const UP              = 1 << 4;
        const DOWN            = 1 << 5;
        const RUN             = 1 << 6;

        // mouse
        const LOOK            = 1 << 7; // hold to mouse-look in the editor
        const PRIMARY         = 1 << 8;
        const SECONDARY       = 1 << 9; // drops the editor selection

        // menus
        const PAUSE           = 1 << 10;
        const CONFIRM         = 1 << 11;
        const MENU_UP         = 1 << 12;
        const MENU_DOWN       = 1 << 13;

        // editor toggles
        const TOGGLE_GRID     = 1 << 14;
        const CYCLE_GRID      = 1 << 15;
        const TOGGLE_TOOLTIPS = 1 << 16;
        const TOGGLE_RASTER   = 1 << 17;

        // editor tool hotkeys
        const TOOL_1          = 1 << 18;
        const TOOL_2          = 1 << 19;
        const TOOL_3          = 1 << 20;
        const TOOL_4          = 1 << 21;
        const TOOL_5          = 1 << 22;
    }
}

impl Buttons {
    pub const TOOL_SLOTS: [Buttons; 5] = [
        Self::TOOL_1,
        Self::TOOL_2,
        Self::TOOL_3,
        Self::TOOL_4,
        Self::TOOL_5,
    ];
}

/// Everything the per-frame update may read about the user's input.
///
/// Built once per frame by the window layer and passed down by reference;
/// there is no other input state anywhere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// Buttons currently down.
    pub held: Buttons,
    /// Buttons that went down since the previous snapshot.
    pub pressed: Buttons,
    /// Cursor movement since the previous snapshot, pixels.
    pub mouse_delta: DVec2,
    pub mouse_pos: DVec2,
    pub wheel: f64,
}

impl InputSnapshot {
    #[inline]
    pub fn held(&self, b: Buttons) -> bool {
        self.held.contains(b)
    }

    #[inline]
    pub fn pressed(&self, b: Buttons) -> bool {
        self.pressed.contains(b)
    }

    /// Lowest tool slot (`1 ..= 5`) pressed this frame.
    pub fn tool_slot(&self) -> Option<usize> {
        Buttons::TOOL_SLOTS
            .iter()
            .position(|&b| self.pressed(b))
            .map(|i| i + 1)
    }

    /// Next snapshot from the current raw state: edges are derived from
    /// `self.held`, the cursor delta from `self.mouse_pos`.
    pub fn advance(&self, held: Buttons, mouse_pos: DVec2, wheel: f64) -> Self {
        Self {
            held,
            pressed: held - self.held,
            mouse_delta: mouse_pos - self.mouse_pos,
            mouse_pos,
            wheel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressed_is_edge_triggered() {
        let s0 = InputSnapshot::default();
        let s1 = s0.advance(Buttons::FORWARD | Buttons::PAUSE, DVec2::new(10.0, 5.0), 0.0);
        assert!(s1.pressed(Buttons::PAUSE));
        assert!(s1.held(Buttons::FORWARD));
        assert_eq!(s1.mouse_delta, DVec2::new(10.0, 5.0));

        let s2 = s1.advance(Buttons::FORWARD | Buttons::PAUSE, DVec2::new(12.0, 5.0), 1.0);
        assert!(!s2.pressed(Buttons::PAUSE), "still held, not pressed again");
        assert!(s2.held(Buttons::PAUSE));
        assert_eq!(s2.mouse_delta, DVec2::new(2.0, 0.0));
        assert_eq!(s2.wheel, 1.0);
    }

    #[test]
    fn tool_slot_comes_from_the_snapshot() {
        let s0 = InputSnapshot::default();
        assert_eq!(s0.tool_slot(), None);
        let s1 = s0.advance(Buttons::TOOL_3 | Buttons::TOOL_5, DVec2::ZERO, 0.0);
        assert_eq!(s1.tool_slot(), Some(3));
        // held, not pressed again
        let s2 = s1.advance(Buttons::TOOL_3, DVec2::ZERO, 0.0);
        assert_eq!(s2.tool_slot(), None);
    }
}
