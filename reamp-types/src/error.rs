use thiserror::Error;

/// Результат для операций декодирования reamp
pub type ReampResult<T> = std::result::Result<T, ReampError>;

/// Типы ошибок формата reamp.
#[derive(Debug, Error)]
pub enum ReampError {
    /// Файл короче фиксированного заголовка
    #[error("Header too short: found {found} bytes, expected {expected}")]
    TooShort { found: usize, expected: usize },

    /// Несовместимая версия формата
    #[error("Unsupported version: found {found}, expected {expected}")]
    UnsupportedVersion { found: i16, expected: i16 },

    /// Размер буфера записи не совпадает с `(channel_count + 1) * 8`
    #[error("Invalid record size: found {found} bytes, expected {expected}")]
    InvalidRecordSize { found: usize, expected: usize },

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReampError {
    /// `true` для структурных ошибок формата (в отличие от ошибок I/O).
    pub fn is_format_error(&self) -> bool {
        !matches!(self, ReampError::Io(_))
    }
}
