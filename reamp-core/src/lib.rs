//! Библиотека декодирования формата reamp
//!
//! Разбор бинарного журнала измерительного прибора: фиксированный заголовок
//! 512 байт и поток записей фиксированного размера, заканчивающийся
//! записью-терминатором.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use reamp_core::ReampReader;
//! use std::fs::File;
//!
//! let mut reader = ReampReader::new(File::open("capture.reamp")?)?;
//! println!("channels: {}", reader.header().channel_count);
//!
//! for record in reader.by_ref() {
//!     let record = record?;
//!     println!("{} {:?}", record.increment_ms, record.channel_values);
//! }
//! println!("stopped: {:?}", reader.stop_reason());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod binary;
pub mod format;
pub mod observer;
pub mod stream;
pub mod termination;

pub use format::*;
pub use observer::*;
pub use reamp_types::*;
pub use stream::*;
pub use termination::*;
