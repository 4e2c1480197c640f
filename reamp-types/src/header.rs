/// Размер одного значения в записи (IEEE-754 double)
pub const REAMP_VALUE_SIZE: usize = 8;

/// Заголовок reamp файла (фиксированный размер 512 байт)
#[derive(Debug, Clone, PartialEq)]
pub struct FileHeader {
    /// Версия формата
    pub version: i16,
    /// Заявленная длина заголовка (только для информации)
    pub header_size: i16,
    /// Количество каналов в каждой записи
    pub channel_count: u8,
    /// Битовая маска активных каналов (декодером не используется)
    pub channel_map: u8,
    /// Номинальный интервал между выборками, мс
    pub sample_interval_ms: f64,
    /// Начало записи (Unix timestamp, секунды с дробной частью)
    pub start_time_s: f64,
}

impl FileHeader {
    /// Размер одной записи в байтах: инкремент + значения каналов.
    pub fn record_size(&self) -> usize {
        record_size(self.channel_count)
    }
}

/// `(channel_count + 1) * 8`
pub fn record_size(channel_count: u8) -> usize {
    (channel_count as usize + 1) * REAMP_VALUE_SIZE
}
