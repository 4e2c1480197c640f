use chrono::{DateTime, Utc};
use reamp_core::{FileHeader, SampleRecord};

use crate::{ExportError, ExportResult, IncrementUnit, NumberLocale, TimeMode};

/// Превращает декодированные записи в текстовые поля строки CSV.
///
/// Декодер отдаёт только `f64`; всё, что зависит от локали и режима времени,
/// происходит здесь.
#[derive(Debug, Clone)]
pub struct RowRenderer {
    locale: NumberLocale,
    time_mode: TimeMode,
    increment_unit: IncrementUnit,
    start_time_s: f64,
}

impl RowRenderer {
    pub fn new(
        header: &FileHeader,
        locale: NumberLocale,
        time_mode: TimeMode,
        increment_unit: IncrementUnit,
    ) -> Self {
        Self {
            locale,
            time_mode,
            increment_unit,
            start_time_s: header.start_time_s,
        }
    }

    /// `time, channel 0, ..., channel N-1`
    pub fn header_row(channel_count: u8) -> Vec<String> {
        std::iter::once("time".to_string())
            .chain((0..channel_count).map(|c| format!("channel {c}")))
            .collect()
    }

    /// Абсолютное время записи, с.
    pub fn absolute_time_s(
        &self,
        increment: f64,
    ) -> f64 {
        self.start_time_s + self.increment_unit.to_seconds(increment)
    }

    /// Текст колонки времени для записи с данным инкрементом.
    pub fn render_time(
        &self,
        increment: f64,
    ) -> ExportResult<String> {
        match self.time_mode {
            TimeMode::Relative => Ok(self.locale.format_fixed(increment)),
            TimeMode::Timestamp => {
                let ts = self.absolute_time_s(increment);
                format_utc(ts).ok_or(ExportError::TimestampOutOfRange(ts))
            }
            TimeMode::Unix => Ok(format_plain(self.absolute_time_s(increment))),
        }
    }

    /// Заполняет `row` полями записи (буфер переиспользуется между строками).
    pub fn render_row(
        &self,
        record: &SampleRecord,
        row: &mut Vec<String>,
    ) -> ExportResult<()> {
        row.clear();
        row.push(self.render_time(record.increment_ms)?);
        row.extend(
            record
                .channel_values
                .iter()
                .map(|v| self.locale.format_fixed(*v)),
        );
        Ok(())
    }
}

/// Календарная метка UTC вида `2024-01-01 00:00:00.500000+00:00`.
///
/// Точность — микросекунды, дробная часть опускается, если равна нулю.
pub fn format_utc(ts_s: f64) -> Option<String> {
    if !ts_s.is_finite() {
        return None;
    }

    let mut secs = ts_s.floor();
    let mut micros = ((ts_s - secs) * 1e6).round();
    if micros >= 1e6 {
        secs += 1.0;
        micros = 0.0;
    }
    if secs.abs() > i64::MAX as f64 {
        return None;
    }

    let micros = micros as u32;
    let dt = DateTime::<Utc>::from_timestamp(secs as i64, micros * 1_000)?;

    let mut s = dt.format("%Y-%m-%d %H:%M:%S").to_string();
    if micros != 0 {
        s.push_str(&format!(".{micros:06}"));
    }
    s.push_str("+00:00");
    Some(s)
}

/// Число без локали: кратчайшая точная запись, всегда с дробной частью.
///
/// Как `repr` в Python: при |x| >= 1e16 или |x| < 1e-4 запись
/// экспоненциальная (`1e+16`, `1.5e-05`).
pub fn format_plain(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(value);
    }

    let s = value.to_string();
    if s.contains('.') {
        s
    } else {
        format!("{s}.0")
    }
}

/// `{:e}` даёт `1.5e-5`; приводим показатель к виду `e-05`.
fn format_exponent(value: f64) -> String {
    let s = format!("{value:e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(d) => ('-', d),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}
