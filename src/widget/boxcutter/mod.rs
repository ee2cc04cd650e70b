//! Interactive selection-and-extraction component

mod input;
mod navigation;
pub mod state;
pub mod types;

pub use state::BoxCutter;
pub use types::{BoxCutterConfig, Drawer, HostEvent, Panels, PointerEvent, ViewStatus};
