use log::{info, warn};
use reamp_types::FileHeader;

use crate::StopReason;

/// Интервал событий прогресса по умолчанию (записей).
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 10_000;

/// Структурированные события декодера.
#[derive(Debug, Clone, Copy)]
pub enum DecodeEvent<'a> {
    /// Заголовок прочитан и прошёл проверку версии
    HeaderParsed(&'a FileHeader),
    /// Выдано ещё `progress_interval` записей
    Progress { records: u64 },
    /// Поток завершён
    Terminated { reason: StopReason, records: u64 },
}

/// Получатель событий декодера.
///
/// Сам декодер ничего не пишет в журнал и не знает о выходном потоке.
pub trait DecodeObserver {
    fn on_event(
        &mut self,
        event: &DecodeEvent<'_>,
    );
}

/// Наблюдатель, игнорирующий все события.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

/// Пишет события в `log` в табличном виде.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl DecodeObserver for NoopObserver {
    fn on_event(
        &mut self,
        _event: &DecodeEvent<'_>,
    ) {
    }
}

impl DecodeObserver for LogObserver {
    fn on_event(
        &mut self,
        event: &DecodeEvent<'_>,
    ) {
        match event {
            DecodeEvent::HeaderParsed(h) => {
                info!("  Version       : {}", h.version);
                info!("  Header size   : {}", h.header_size);
                info!("  Channels      : {}", h.channel_count);
                info!("  Channel map   : {:#010b}", h.channel_map);
                info!("  Sample time   : {} ms", h.sample_interval_ms);
                info!("  Start time    : {} s", h.start_time_s);
                info!("  Record size   : {} B", h.record_size());
            }
            DecodeEvent::Progress { records } => {
                info!("samples decoded.. {records}");
            }
            DecodeEvent::Terminated { reason, records } => match reason {
                StopReason::TruncatedRecord { trailing_bytes } => {
                    warn!(
                        "Input ends with a partial record ({trailing_bytes} B), \
                         stopping after {records} samples"
                    );
                }
                _ => info!("Stream terminated ({reason}) after {records} samples"),
            },
        }
    }
}

impl<O: DecodeObserver + ?Sized> DecodeObserver for Box<O> {
    fn on_event(
        &mut self,
        event: &DecodeEvent<'_>,
    ) {
        (**self).on_event(event)
    }
}
