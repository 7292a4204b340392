pub mod compliance;
pub mod path;
pub mod scale;

pub use path::{LivePath, Metric};
pub use scale::PixelScale;
