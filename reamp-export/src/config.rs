use std::path::{Path, PathBuf};

use reamp_core::DEFAULT_PROGRESS_INTERVAL;

/// Разделитель полей CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
}

/// Что выводить в колонке времени.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    /// Инкремент как есть, в формате локали
    Relative,
    /// Календарная метка UTC
    Timestamp,
    /// Абсолютное время числом (Unix epoch)
    Unix,
}

/// Как складывать время старта (секунды) с инкрементом.
///
/// Прибор хранит инкремент в миллисекундах, но исторически экспорт складывал
/// его с секундами без пересчёта. По умолчанию это поведение сохранено.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementUnit {
    /// `start_time_s + increment`
    Seconds,
    /// `start_time_s + increment / 1000`
    Milliseconds,
}

/// Полная конфигурация экспорта одного файла.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Путь к входному .reamp файлу
    pub input_path: PathBuf,
    /// Путь к выходному CSV
    pub output_path: PathBuf,
    /// Разделитель полей
    pub delimiter: Delimiter,
    /// Метка кодировки выходного файла (`utf-8`, `cp1252`, ...)
    pub encoding: String,
    /// Режим колонки времени
    pub time_mode: TimeMode,
    /// Идентификатор локали для десятичного разделителя
    pub locale: String,
    /// Единица инкремента при вычислении абсолютного времени
    pub increment_unit: IncrementUnit,
    /// Интервал вывода прогресса (записей)
    pub progress_interval: u64,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl ExportConfig {
    /// Конфигурация по умолчанию для `input`, выход рядом с расширением `.csv`.
    pub fn for_input(input: impl Into<PathBuf>) -> Self {
        let input_path = input.into();
        Self {
            output_path: default_output_path(&input_path),
            input_path,
            ..Self::default()
        }
    }
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }
}

impl IncrementUnit {
    /// Перевод инкремента в секунды для сложения со временем старта.
    pub fn to_seconds(
        &self,
        increment: f64,
    ) -> f64 {
        match self {
            IncrementUnit::Seconds => increment,
            IncrementUnit::Milliseconds => increment / 1000.0,
        }
    }
}

/// Входной путь с расширением, заменённым на `csv`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("csv")
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("capture.reamp"),
            output_path: PathBuf::from("capture.csv"),
            delimiter: Delimiter::Semicolon,
            encoding: "utf-8".to_string(),
            time_mode: TimeMode::Relative,
            locale: "German".to_string(),
            increment_unit: IncrementUnit::Seconds,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_byte() as char)
    }
}

impl std::str::FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "," | "comma" => Ok(Delimiter::Comma),
            ";" | "semicolon" => Ok(Delimiter::Semicolon),
            _ => Err(format!("Unknown delimiter '{s}'. Use: , or ;")),
        }
    }
}

impl std::fmt::Display for TimeMode {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            TimeMode::Relative => write!(f, "relative"),
            TimeMode::Timestamp => write!(f, "timestamp"),
            TimeMode::Unix => write!(f, "unix"),
        }
    }
}

impl std::str::FromStr for TimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relative" | "rel" => Ok(TimeMode::Relative),
            "timestamp" | "ts" => Ok(TimeMode::Timestamp),
            "unix" => Ok(TimeMode::Unix),
            _ => Err(format!(
                "Unknown time mode '{s}'. Use: relative, timestamp, unix"
            )),
        }
    }
}

impl std::fmt::Display for IncrementUnit {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            IncrementUnit::Seconds => write!(f, "seconds"),
            IncrementUnit::Milliseconds => write!(f, "milliseconds"),
        }
    }
}

impl std::str::FromStr for IncrementUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(IncrementUnit::Seconds),
            "ms" | "milliseconds" => Ok(IncrementUnit::Milliseconds),
            _ => Err(format!(
                "Unknown increment unit '{s}'. Use: seconds, milliseconds"
            )),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
