use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry constants for the value-stream map. The defaults are load
/// bearing: element identifiers encode the resulting coordinates, so an
/// external position editor written against the defaults expects exactly
/// these numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Pipeline box size.
    pub pipeline_width: i32,
    pub pipeline_height: i32,
    /// Horizontal spacing between a dependency and its dependent.
    pub gutter: i32,
    /// Top-left margin of the first row.
    pub margin: i32,
    /// Vertical band allotted per sibling when centering a chain.
    pub sibling_band: i32,
    /// Length of the gap an edge leaves before the dependent box.
    pub edge_stub: i32,
    /// Arrowhead glyph size and insertion offsets.
    pub arrow_size: i32,
    pub arrow_offset_x: i32,
    pub arrow_offset_y: i32,
    /// Minimum canvas edge; the diagram grows past it as needed.
    pub min_canvas: i32,
    /// Per-character width estimate used to center text.
    pub char_width: i32,
    pub icon_size: i32,
    pub icon_margin: i32,
    /// Y offset of the task icon row inside a box.
    pub task_row_offset: i32,
    /// Maximum task icons drawn before the overflow badge.
    pub max_task_icons: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pipeline_width: 300,
            pipeline_height: 100,
            gutter: 50,
            margin: 50,
            sibling_band: 150,
            edge_stub: 30,
            arrow_size: 25,
            arrow_offset_x: 9,
            arrow_offset_y: 12,
            min_canvas: 3000,
            char_width: 8,
            icon_size: 30,
            icon_margin: 5,
            task_row_offset: 68,
            max_task_icons: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 3000.0,
            height: 3000.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    text_color: Option<String>,
    line_color: Option<String>,
    stroke_width: Option<f32>,
    node_gradient_top: Option<String>,
    node_gradient_bottom: Option<String>,
    placeholder_gradient_top: Option<String>,
    placeholder_gradient_bottom: Option<String>,
    counter_fill: Option<String>,
    counter_text_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutFile {
    pipeline_width: Option<i32>,
    pipeline_height: Option<i32>,
    gutter: Option<i32>,
    margin: Option<i32>,
    sibling_band: Option<i32>,
    edge_stub: Option<i32>,
    min_canvas: Option<i32>,
    max_task_icons: Option<usize>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = serde_json::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "modern" {
            config.theme = Theme::modern();
        } else if theme_name == "classic" || theme_name == "default" {
            config.theme = Theme::classic();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.stroke_width {
            config.theme.stroke_width = v;
        }
        if let Some(v) = vars.node_gradient_top {
            config.theme.node_gradient_top = v;
        }
        if let Some(v) = vars.node_gradient_bottom {
            config.theme.node_gradient_bottom = v;
        }
        if let Some(v) = vars.placeholder_gradient_top {
            config.theme.placeholder_gradient_top = v;
        }
        if let Some(v) = vars.placeholder_gradient_bottom {
            config.theme.placeholder_gradient_bottom = v;
        }
        if let Some(v) = vars.counter_fill {
            config.theme.counter_fill = v;
        }
        if let Some(v) = vars.counter_text_color {
            config.theme.counter_text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.pipeline_width {
            config.layout.pipeline_width = v;
        }
        if let Some(v) = layout.pipeline_height {
            config.layout.pipeline_height = v;
        }
        if let Some(v) = layout.gutter {
            config.layout.gutter = v;
        }
        if let Some(v) = layout.margin {
            config.layout.margin = v;
        }
        if let Some(v) = layout.sibling_band {
            config.layout.sibling_band = v;
        }
        if let Some(v) = layout.edge_stub {
            config.layout.edge_stub = v;
        }
        if let Some(v) = layout.min_canvas {
            config.layout.min_canvas = v;
        }
        if let Some(v) = layout.max_task_icons {
            config.layout.max_task_icons = v;
        }
    }

    config.render.background = config.theme.background.clone();

    Ok(config)
}
