//! Config fixtures for tests.

/// Small canvases covering both neighbor policies and scan orders
pub const SMALL_CANVASES: &str = r#"
canvases:
  tiny:
    width: 4
    height: 2
    levels: 2
    neighbor_policy: first
    scan_order: row-major
    seed: 7
    chunk_size: 3
  square:
    width: 8
    height: 8
    levels: 4
    similarity_tolerance: 16
    chunk_size: 10
  strip:
    width: 64
    height: 1
    levels: 4
    scan_order: row-major
    seed: 11
default_canvas: square
"#;

/// A config containing two walkable and two broken canvases
pub const BROKEN_CANVASES: &str = r#"
canvases:
  ok:
    width: 4
    height: 2
    levels: 2
  mismatch:
    width: 4
    height: 4
    levels: 2
  fractional:
    width: 400
    height: 20
    levels: 20
  untolerant:
    width: 4
    height: 2
    levels: 2
    similarity_tolerance: 0
"#;

/// A canvas above the server's cell limit
pub const OVERSIZED_CANVAS: &str = r#"
canvases:
  huge:
    width: 4096
    height: 4096
    levels: 256
"#;

/// One small canvas with room for two cached renders
pub const BOUNDED_CACHE: &str = r#"
canvases:
  tiny:
    width: 4
    height: 2
    levels: 2
render_cache_capacity: 2
"#;
