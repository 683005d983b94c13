//! UI Components

pub mod dialogs;
pub mod explorer;
pub mod item_grid;
pub mod overlays;
pub mod welcome;

pub use dialogs::NoticeDialog;
pub use explorer::{Explorer, ExplorerInputs};
pub use item_grid::{CellStyle, ItemGrid};
pub use overlays::OverlayWindows;
pub use welcome::WelcomeScreen;
