//! Presentation model of the camera overlay. Nothing here draws pixels: the
//! renderer turns the walked path and the enabled tools into plain data a
//! view layer can paint.

pub mod frame;
pub mod guide;
pub mod tool;
pub mod trace;

pub use frame::{OverlayFrame, OverlayInput, OverlayRenderer};
pub use tool::{Tool, ToolSet};
pub use trace::Viewport;
