#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod parser;
pub mod render;
pub mod theme;

pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use layout::{LayoutError, VsmLayout, compute_layout};
pub use model::{Pipeline, Point};
pub use render::render_svg;
pub use theme::Theme;

#[cfg(feature = "cli")]
pub use cli::run;
