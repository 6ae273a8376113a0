pub mod encode;

pub use encode::{encode_rgb, render_canvas};
