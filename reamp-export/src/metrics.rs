use reamp_core::StopReason;

use crate::render::format_utc;

/// Итоги экспорта одного файла.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub duration_secs: f64,
    pub records_written: u64,
    pub stop_reason: Option<StopReason>,
    /// Абсолютное время последней записи, с
    pub last_time_s: Option<f64>,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl ExportSummary {
    /// Скорость экспорта, записей/с.
    pub fn records_per_sec(&self) -> f64 {
        if self.duration_secs < 1e-9 {
            return 0.0;
        }

        self.records_written as f64 / self.duration_secs
    }

    /// `true`, если файл закончился обрывом записи.
    pub fn was_truncated(&self) -> bool {
        matches!(self.stop_reason, Some(StopReason::TruncatedRecord { .. }))
    }
}

impl std::fmt::Display for ExportSummary {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(f, "  Duration      : {:.1}s", self.duration_secs)?;
        writeln!(f, "  Samples       : {}", self.records_written)?;
        match self.stop_reason {
            Some(reason) => writeln!(f, "  Stopped on    : {reason}")?,
            None => writeln!(f, "  Stopped on    : -")?,
        }
        if let Some(last) = self.last_time_s {
            writeln!(f, "  Last time     : {last}")?;
            if let Some(utc) = format_utc(last) {
                writeln!(f, "                  {utc}")?;
            }
        }
        writeln!(f, "  Input size    : {} B", self.input_bytes)?;
        writeln!(f, "  Output size   : {} B", self.output_bytes)?;
        writeln!(f, "  Throughput    : {:.0} samples/s", self.records_per_sec())?;
        write!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")
    }
}
