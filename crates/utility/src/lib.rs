pub mod format;
pub mod geo;
pub mod id;
pub mod serde;
