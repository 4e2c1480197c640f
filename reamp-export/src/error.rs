use std::path::PathBuf;

use reamp_core::ReampError;
use thiserror::Error;

/// Код выхода: успех.
pub const EXIT_OK: i32 = 0;
/// Код выхода: прочая ошибка.
pub const EXIT_FAILURE: i32 = 1;
/// Код выхода: ошибка аргументов командной строки (совпадает с clap).
pub const EXIT_USAGE: i32 = 2;
/// Код выхода: входной файл не найден.
pub const EXIT_INPUT_NOT_FOUND: i32 = 3;
/// Код выхода: формат файла не поддерживается.
pub const EXIT_UNSUPPORTED_FORMAT: i32 = 4;

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Входной файл не существует
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Ошибка формата или чтения reamp
    #[error("Reamp error: {0}")]
    Format(#[from] ReampError),

    /// Ошибка записи файла
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка CSV writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Некорректная конфигурация (локаль, кодировка, ...)
    #[error("Config error: {0}")]
    Config(String),

    /// Абсолютное время не представимо календарной датой
    #[error("Timestamp out of range: {0:e} s")]
    TimestampOutOfRange(f64),
}

impl ExportError {
    /// Код выхода процесса для этой ошибки.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExportError::InputNotFound(_) => EXIT_INPUT_NOT_FOUND,
            ExportError::Format(e) if e.is_format_error() => EXIT_UNSUPPORTED_FORMAT,
            _ => EXIT_FAILURE,
        }
    }
}
