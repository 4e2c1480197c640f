pub mod config;
pub mod error;
pub mod exporter;
pub mod locale;
pub mod metrics;
pub mod render;
pub mod sink;

pub use config::*;
pub use error::*;
pub use exporter::*;
pub use locale::*;
pub use metrics::*;
pub use render::*;
pub use sink::*;
