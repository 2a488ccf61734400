//! Active tool state.
//!
//! The sidebar tool determines which panel the host shows. Some tools only
//! make sense with a selection and snap back to `Select` when it is
//! cleared. The `Draw` tool additionally toggles the renderer's freehand
//! capture mode.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveTool {
    #[default]
    Select,
    Shapes,
    Text,
    Images,
    Draw,
    Fill,
    StrokeColor,
    StrokeWidth,
    Font,
    Opacity,
    Filter,
    Settings,
    Ai,
    RemoveBg,
    Templates,
}

impl ActiveTool {
    pub const ALL: [ActiveTool; 15] = [
        ActiveTool::Select,
        ActiveTool::Shapes,
        ActiveTool::Text,
        ActiveTool::Images,
        ActiveTool::Draw,
        ActiveTool::Fill,
        ActiveTool::StrokeColor,
        ActiveTool::StrokeWidth,
        ActiveTool::Font,
        ActiveTool::Opacity,
        ActiveTool::Filter,
        ActiveTool::Settings,
        ActiveTool::Ai,
        ActiveTool::RemoveBg,
        ActiveTool::Templates,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActiveTool::Select => "select",
            ActiveTool::Shapes => "shapes",
            ActiveTool::Text => "text",
            ActiveTool::Images => "images",
            ActiveTool::Draw => "draw",
            ActiveTool::Fill => "fill",
            ActiveTool::StrokeColor => "stroke-color",
            ActiveTool::StrokeWidth => "stroke-width",
            ActiveTool::Font => "font",
            ActiveTool::Opacity => "opacity",
            ActiveTool::Filter => "filter",
            ActiveTool::Settings => "settings",
            ActiveTool::Ai => "ai",
            ActiveTool::RemoveBg => "remove-bg",
            ActiveTool::Templates => "templates",
        }
    }

    /// Tools whose panel edits the current selection.
    pub fn is_selection_dependent(&self) -> bool {
        matches!(
            self,
            ActiveTool::Fill
                | ActiveTool::Font
                | ActiveTool::Filter
                | ActiveTool::Opacity
                | ActiveTool::RemoveBg
                | ActiveTool::StrokeColor
                | ActiveTool::StrokeWidth
        )
    }
}

impl fmt::Display for ActiveTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool `{0}`")]
pub struct UnknownTool(pub String);

impl FromStr for ActiveTool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActiveTool::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}

/// Net effect of a tool change on freehand capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawModeChange {
    Unchanged,
    Enable,
    Disable,
}

#[derive(Debug, Clone, Default)]
pub struct ToolState {
    active: ActiveTool,
}

impl ToolState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> ActiveTool {
        self.active
    }

    /// Switch to `tool`. Choosing the active tool again returns to `Select`.
    pub fn choose(&mut self, tool: ActiveTool) -> DrawModeChange {
        let leaving_draw = self.active == ActiveTool::Draw;
        let entering_draw = tool == ActiveTool::Draw;
        // Re-choosing draw enables then immediately disables capture.
        let change = if leaving_draw {
            DrawModeChange::Disable
        } else if entering_draw {
            DrawModeChange::Enable
        } else {
            DrawModeChange::Unchanged
        };

        self.active = if tool == self.active {
            ActiveTool::Select
        } else {
            tool
        };
        change
    }

    /// Snap a selection-dependent tool back to `Select`.
    pub fn on_selection_cleared(&mut self) {
        if self.active.is_selection_dependent() {
            self.active = ActiveTool::Select;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for tool in ActiveTool::ALL {
            assert_eq!(tool.name().parse::<ActiveTool>(), Ok(tool));
        }
        assert!("lasso".parse::<ActiveTool>().is_err());
    }

    #[test]
    fn rechoosing_returns_to_select() {
        let mut tools = ToolState::new();
        assert_eq!(tools.choose(ActiveTool::Fill), DrawModeChange::Unchanged);
        assert_eq!(tools.active(), ActiveTool::Fill);
        tools.choose(ActiveTool::Fill);
        assert_eq!(tools.active(), ActiveTool::Select);
    }

    #[test]
    fn draw_toggles_capture() {
        let mut tools = ToolState::new();
        assert_eq!(tools.choose(ActiveTool::Draw), DrawModeChange::Enable);
        assert_eq!(tools.choose(ActiveTool::Shapes), DrawModeChange::Disable);
        assert_eq!(tools.choose(ActiveTool::Draw), DrawModeChange::Enable);
        assert_eq!(tools.choose(ActiveTool::Draw), DrawModeChange::Disable);
        assert_eq!(tools.active(), ActiveTool::Select);
    }

    #[test]
    fn selection_dependent_tools_snap_back() {
        let mut tools = ToolState::new();
        tools.choose(ActiveTool::Opacity);
        tools.on_selection_cleared();
        assert_eq!(tools.active(), ActiveTool::Select);

        tools.choose(ActiveTool::Shapes);
        tools.on_selection_cleared();
        assert_eq!(tools.active(), ActiveTool::Shapes);
    }
}
