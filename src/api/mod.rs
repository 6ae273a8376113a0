pub mod canvas;

pub use canvas::{__path_handle_canvas_image, __path_handle_canvas_stream, __path_handle_list_canvases};
pub use canvas::{
    handle_canvas_image, handle_canvas_stream, handle_list_canvases, CanvasInfo,
    CanvasListResponse, SeedQuery, SEED_HEADER,
};
