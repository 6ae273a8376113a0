pub mod canvas_spec;
pub mod config;

pub use canvas_spec::{CanvasSpec, MAX_CANVAS_CELLS};
pub use config::{AppConfig, CanvasConfig, NeighborPolicySetting, ScanOrderSetting};
