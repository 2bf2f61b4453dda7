/// Editing tools. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tool {
    #[default]
    Place,
    Delete,
    Translate,
    Rotate,
    Scale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToolInfo {
    pub tool: Tool,
    pub label: &'static str,
    pub tooltip: &'static str,
}

/// Indexed by `Tool as usize`.
pub static TOOLS: [ToolInfo; 5] = [
    ToolInfo {
        tool: Tool::Place,
        label: "Place",
        tooltip: "Place Block (Left Click)",
    },
    ToolInfo {
        tool: Tool::Delete,
        label: "Delete",
        tooltip: "Delete Block (Left Click)",
    },
    ToolInfo {
        tool: Tool::Translate,
        label: "Translate",
        tooltip: "Move Block (Gizmo)",
    },
    ToolInfo {
        tool: Tool::Rotate,
        label: "Rotate",
        tooltip: "Rotate Block (Coming Soon)",
    },
    ToolInfo {
        tool: Tool::Scale,
        label: "Scale",
        tooltip: "Scale Block (Coming Soon)",
    },
];

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::Place,
        Tool::Delete,
        Tool::Translate,
        Tool::Rotate,
        Tool::Scale,
    ];

    #[inline]
    pub fn info(self) -> &'static ToolInfo {
        &TOOLS[self as usize]
    }

    #[inline]
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Hotkey slot `1 ..= 5`.
    pub fn from_slot(slot: usize) -> Option<Tool> {
        Self::ALL.get(slot.checked_sub(1)?).copied()
    }
}
