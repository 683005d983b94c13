//! Meal Explorer UI Layer
//!
//! Provides:
//! - egui-based screens, overlays and dialogs
//! - wgpu rendering pipeline
//! - Theme and texture management

pub mod components;
pub mod renderer;
pub mod shell;
pub mod textures;
pub mod theme;

pub use renderer::{EguiFrame, Renderer};
pub use shell::Shell;
pub use textures::{load_image_file, TextureCache};
pub use theme::Theme;
