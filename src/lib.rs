pub mod error;
pub mod geometry;
pub mod math;
pub mod noding;
pub mod overlay;
pub mod precision;

pub use error::{OverlisError, Result};
pub use geometry::{Geometry, Location, Polygon};
pub use overlay::{overlay, overlay_with, OverlayOp};
pub use precision::PrecisionModel;
