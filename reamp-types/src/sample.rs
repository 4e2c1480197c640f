/// Одна декодированная запись (живёт до отрисовки строки)
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRecord {
    /// Время от начала записи в том виде, как его хранит прибор
    pub increment_ms: f64,
    /// Значения каналов в порядке записи, длина = `channel_count`
    pub channel_values: Vec<f64>,
}

impl SampleRecord {
    pub fn new(
        increment_ms: f64,
        channel_values: Vec<f64>,
    ) -> Self {
        SampleRecord {
            increment_ms,
            channel_values,
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channel_values.len()
    }
}
