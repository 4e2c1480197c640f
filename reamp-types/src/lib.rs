pub mod error;
pub mod header;
pub mod sample;

pub use error::*;
pub use header::*;
pub use sample::*;
