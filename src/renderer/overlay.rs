// Screen-space panels for menus and the editor tool strip. There is no
// text rendering; the window title carries the labels.

use super::{DrawCall, Panel, Rgba};
use crate::engine::types::Screen;

pub const MENU_BG: Rgba = 0x00_10_10_18;
pub const ITEM: Rgba = 0x00_40_40_50;
pub const ITEM_SELECTED: Rgba = 0x00_D0_A0_30;
pub const SLOT: Rgba = 0x00_30_30_30;
pub const SLOT_ACTIVE: Rgba = 0x00_30_C0_60;

const SLOT_SIZE: usize = 24;
const SLOT_GAP: usize = 4;

/// Full-screen background for the main menu.
pub fn menu_background(screen: &Screen, out: &mut Vec<DrawCall>) {
    out.push(DrawCall::Panel(Panel {
        x: 0,
        y: 0,
        w: screen.w,
        h: screen.h,
        color: MENU_BG,
    }));
}

/// `count` bars stacked in the middle of the screen, `selected` lit.
pub fn menu(screen: &Screen, count: usize, selected: usize, out: &mut Vec<DrawCall>) {
    let bar_w = screen.w / 3;
    let bar_h = (screen.h / 12).max(1);
    let gap = bar_h / 2;
    let total = count * bar_h + count.saturating_sub(1) * gap;
    let x = (screen.w - bar_w) / 2;
    let y0 = screen.h.saturating_sub(total) / 2;

    out.extend((0..count).map(|i| {
        DrawCall::Panel(Panel {
            x,
            y: y0 + i * (bar_h + gap),
            w: bar_w,
            h: bar_h,
            color: if i == selected { ITEM_SELECTED } else { ITEM },
        })
    }));
}

/// Row of tool slots in the top-left corner, `active` lit.
pub fn tool_strip(count: usize, active: usize, out: &mut Vec<DrawCall>) {
    out.extend((0..count).map(|i| {
        DrawCall::Panel(Panel {
            x: SLOT_GAP + i * (SLOT_SIZE + SLOT_GAP),
            y: SLOT_GAP,
            w: SLOT_SIZE,
            h: SLOT_SIZE,
            color: if i == active { SLOT_ACTIVE } else { SLOT },
        })
    }));
}
