use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub text_color: String,
    pub line_color: String,
    pub stroke_width: f32,
    /// Vertical gradient on real pipeline boxes.
    pub node_gradient_top: String,
    pub node_gradient_bottom: String,
    /// Vertical gradient on placeholder boxes.
    pub placeholder_gradient_top: String,
    pub placeholder_gradient_bottom: String,
    pub counter_fill: String,
    pub counter_text_color: String,
    pub background: String,
}

impl Theme {
    /// The classic Azure pipeline map palette.
    pub fn classic() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            text_color: "black".to_string(),
            line_color: "black".to_string(),
            stroke_width: 1.0,
            node_gradient_top: "#d8f3ff".to_string(),
            node_gradient_bottom: "#89baff".to_string(),
            placeholder_gradient_top: "#f0f0f0".to_string(),
            placeholder_gradient_bottom: "#c0c0c0".to_string(),
            counter_fill: "red".to_string(),
            counter_text_color: "white".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            stroke_width: 1.0,
            node_gradient_top: "#F8FAFF".to_string(),
            node_gradient_bottom: "#C7D2E5".to_string(),
            placeholder_gradient_top: "#F4F4F4".to_string(),
            placeholder_gradient_bottom: "#D4D4D4".to_string(),
            counter_fill: "#D64550".to_string(),
            counter_text_color: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
