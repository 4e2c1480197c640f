//! Спецификация формата файлов reamp версии 4
//!
//! Файл состоит из фиксированного заголовка 512 байт и следующей за ним
//! последовательности записей фиксированного размера. Все многобайтовые
//! числа хранятся в порядке little-endian.
//!
//! ```text
//! 0x000  version             i16
//! 0x002  header_size         i16   (только информативно)
//! 0x008  channel_count       u8
//! 0x009  channel_map         u8
//! 0x00A  sample_interval     i16   десятые доли мс
//! 0x1F8  start_time          u64   мс от Unix epoch
//! 0x200  записи: increment f64, затем channel_count × f64
//! ```

use reamp_types::{record_size, FileHeader, ReampError, ReampResult, SampleRecord};

use crate::binary::{read_f64_at, read_i16_at, read_u64_at};

pub use reamp_types::REAMP_VALUE_SIZE;

/// Единственная поддерживаемая версия формата
pub const REAMP_VERSION: i16 = 4;

/// Размер фиксированного заголовка (512 байт)
pub const REAMP_HEADER_SIZE: usize = 0x200;

pub const OFFSET_VERSION: usize = 0x00;
pub const OFFSET_HEADER_SIZE: usize = 0x02;
pub const OFFSET_CHANNEL_COUNT: usize = 0x08;
pub const OFFSET_CHANNEL_MAP: usize = 0x09;
pub const OFFSET_SAMPLE_INTERVAL: usize = 0x0A;
pub const OFFSET_START_TIME: usize = 0x1F8;

/// Интервал хранится в десятых долях миллисекунды
const SAMPLE_INTERVAL_TICKS_PER_MS: f64 = 10.0;

/// Время старта хранится в миллисекундах
const START_TIME_MS_PER_S: f64 = 1000.0;

/// Разбор заголовка reamp.
pub trait FileHeaderExt: Sized {
    /// Разбирает первые 512 байт `buf`. Байты после заголовка игнорируются.
    fn parse(buf: &[u8]) -> ReampResult<Self>;
}

/// Декодирование одной записи.
pub trait SampleRecordExt: Sized {
    /// Декодирует запись ровно из `(channel_count + 1) * 8` байт.
    fn decode(
        buf: &[u8],
        channel_count: u8,
    ) -> ReampResult<Self>;
}

impl FileHeaderExt for FileHeader {
    fn parse(buf: &[u8]) -> ReampResult<Self> {
        if buf.len() < REAMP_HEADER_SIZE {
            return Err(ReampError::TooShort {
                found: buf.len(),
                expected: REAMP_HEADER_SIZE,
            });
        }

        let version = read_i16_at(buf, OFFSET_VERSION);
        if version != REAMP_VERSION {
            return Err(ReampError::UnsupportedVersion {
                found: version,
                expected: REAMP_VERSION,
            });
        }

        let header_size = read_i16_at(buf, OFFSET_HEADER_SIZE);
        let channel_count = buf[OFFSET_CHANNEL_COUNT];
        let channel_map = buf[OFFSET_CHANNEL_MAP];
        let sample_interval_ms =
            read_i16_at(buf, OFFSET_SAMPLE_INTERVAL) as f64 / SAMPLE_INTERVAL_TICKS_PER_MS;
        let start_time_s = read_u64_at(buf, OFFSET_START_TIME) as f64 / START_TIME_MS_PER_S;

        Ok(FileHeader {
            version,
            header_size,
            channel_count,
            channel_map,
            sample_interval_ms,
            start_time_s,
        })
    }
}

impl SampleRecordExt for SampleRecord {
    fn decode(
        buf: &[u8],
        channel_count: u8,
    ) -> ReampResult<Self> {
        let expected = record_size(channel_count);

        if buf.len() != expected {
            return Err(ReampError::InvalidRecordSize {
                found: buf.len(),
                expected,
            });
        }

        let increment_ms = decode_increment(buf);
        let channel_values = buf[REAMP_VALUE_SIZE..]
            .chunks_exact(REAMP_VALUE_SIZE)
            .map(|chunk| read_f64_at(chunk, 0))
            .collect();

        Ok(SampleRecord {
            increment_ms,
            channel_values,
        })
    }
}

/// Инкремент хранится в первых 8 байтах записи.
pub fn decode_increment(record: &[u8]) -> f64 {
    read_f64_at(record, 0)
}
