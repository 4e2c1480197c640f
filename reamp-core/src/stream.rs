use std::{
    fmt,
    io::{BufReader, Read},
};

use reamp_types::{FileHeader, ReampResult, SampleRecord};

use crate::{
    binary::read_full,
    format::{decode_increment, FileHeaderExt, SampleRecordExt, REAMP_HEADER_SIZE},
    observer::{DecodeEvent, DecodeObserver, NoopObserver, DEFAULT_PROGRESS_INTERVAL},
    termination::{RepeatedIncrement, TerminationPolicy, Verdict},
};

/// Потоковый читатель reamp файлов.
///
/// Заголовок читается и проверяется в конструкторе, затем каждый вызов
/// [`ReampReader::next_record`] читает ровно одну запись. Поток конечен и не
/// перезапускается: после остановки все вызовы возвращают `None`.
pub struct ReampReader<R: Read, P: TerminationPolicy = RepeatedIncrement> {
    reader: BufReader<R>,
    header: FileHeader,
    policy: P,
    observer: Box<dyn DecodeObserver>,
    record_buf: Vec<u8>,
    state: DecoderState,
    stats: DecodeStats,
    progress_interval: u64,
}

/// Состояние декодера после разбора заголовка.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecoderState {
    /// Заголовок прочитан, записей ещё не запрашивали
    HeaderParsed,
    /// Идёт чтение записей
    Streaming,
    /// Поток закончен
    Terminated(StopReason),
}

/// Почему поток записей закончился.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopReason {
    /// Входные данные закончились ровно на границе записи
    EndOfInput,
    /// В конце файла неполная запись (прибор прервал запись)
    TruncatedRecord { trailing_bytes: usize },
    /// Запись-терминатор по правилу политики
    Terminator { increment: f64 },
    /// Ошибка ввода/вывода при чтении записи
    Failed,
}

/// Статистика, накопленная [`ReampReader`] в процессе чтения.
#[derive(Debug, Default, Clone)]
pub struct DecodeStats {
    /// Выдано записей.
    pub records: u64,
    /// Прочитано байт после заголовка (включая терминатор и хвост).
    pub bytes_consumed: u64,
    /// Размер неполной последней записи, если она была.
    pub trailing_bytes: usize,
    /// Инкремент последней выданной записи.
    pub last_increment: Option<f64>,
}

impl<R: Read> ReampReader<R, RepeatedIncrement> {
    /// Создаёт читатель с политикой версии 4 и без наблюдателя.
    pub fn new(inner: R) -> ReampResult<Self> {
        Self::with_observer(inner, NoopObserver)
    }

    /// Создаёт читатель с политикой версии 4, сообщающий события `observer`.
    pub fn with_observer(
        inner: R,
        observer: impl DecodeObserver + 'static,
    ) -> ReampResult<Self> {
        Self::with_policy(inner, RepeatedIncrement::new(), observer)
    }
}

impl<R: Read, P: TerminationPolicy> ReampReader<R, P> {
    /// Создаёт читатель с произвольной политикой завершения.
    pub fn with_policy(
        inner: R,
        policy: P,
        observer: impl DecodeObserver + 'static,
    ) -> ReampResult<Self> {
        let mut reader = BufReader::new(inner);
        let mut hdr_buf = [0u8; REAMP_HEADER_SIZE];

        let filled = read_full(&mut reader, &mut hdr_buf)?;
        let header = FileHeader::parse(&hdr_buf[..filled])?;

        let mut observer: Box<dyn DecodeObserver> = Box::new(observer);
        observer.on_event(&DecodeEvent::HeaderParsed(&header));

        Ok(Self {
            reader,
            record_buf: vec![0u8; header.record_size()],
            header,
            policy,
            observer,
            state: DecoderState::HeaderParsed,
            stats: DecodeStats::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        })
    }

    /// Интервал событий [`DecodeEvent::Progress`]; 0 отключает их.
    pub fn set_progress_interval(
        &mut self,
        records: u64,
    ) {
        self.progress_interval = records;
    }

    /// Возвращает следующую запись или `None` после остановки.
    pub fn next_record(&mut self) -> Option<ReampResult<SampleRecord>> {
        if let DecoderState::Terminated(_) = self.state {
            return None;
        }
        self.state = DecoderState::Streaming;

        let record_size = self.record_buf.len();
        let filled = match read_full(&mut self.reader, &mut self.record_buf) {
            Ok(n) => n,
            Err(e) => {
                self.terminate(StopReason::Failed);
                return Some(Err(e.into()));
            }
        };
        self.stats.bytes_consumed += filled as u64;

        // Неполная запись в конце: мягкая остановка, не ошибка
        if filled < record_size {
            let reason = if filled == 0 {
                StopReason::EndOfInput
            } else {
                self.stats.trailing_bytes = filled;
                StopReason::TruncatedRecord {
                    trailing_bytes: filled,
                }
            };
            self.terminate(reason);
            return None;
        }

        let increment = decode_increment(&self.record_buf);
        if self.policy.check(increment) == Verdict::Stop {
            self.terminate(StopReason::Terminator { increment });
            return None;
        }

        let record = match SampleRecord::decode(&self.record_buf, self.header.channel_count) {
            Ok(r) => r,
            Err(e) => {
                self.terminate(StopReason::Failed);
                return Some(Err(e));
            }
        };

        self.stats.records += 1;
        self.stats.last_increment = Some(increment);

        if self.progress_interval > 0 && self.stats.records % self.progress_interval == 0 {
            self.observer.on_event(&DecodeEvent::Progress {
                records: self.stats.records,
            });
        }

        Some(Ok(record))
    }

    fn terminate(
        &mut self,
        reason: StopReason,
    ) {
        self.state = DecoderState::Terminated(reason);
        self.observer.on_event(&DecodeEvent::Terminated {
            reason,
            records: self.stats.records,
        });
    }

    /// Прочитанный и проверенный заголовок файла.
    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    /// Накопленная статистика чтения.
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Причина остановки (`None`, пока поток не закончен).
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            DecoderState::Terminated(reason) => Some(reason),
            _ => None,
        }
    }

    /// Активная политика завершения.
    pub fn policy(&self) -> &P {
        &self.policy
    }
}

impl<R: Read, P: TerminationPolicy> Iterator for ReampReader<R, P> {
    type Item = ReampResult<SampleRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

impl fmt::Display for StopReason {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            StopReason::EndOfInput => write!(f, "end of input"),
            StopReason::TruncatedRecord { trailing_bytes } => {
                write!(f, "truncated record, {trailing_bytes} trailing bytes")
            }
            StopReason::Terminator { increment } => {
                write!(f, "terminator record, increment {increment}")
            }
            StopReason::Failed => write!(f, "read error"),
        }
    }
}

/// Convenience: читает все записи, собирая их в вектор.
pub fn read_all_records<R: Read, P: TerminationPolicy>(
    reader: &mut ReampReader<R, P>,
) -> ReampResult<Vec<SampleRecord>> {
    let mut records = Vec::new();
    while let Some(result) = reader.next_record() {
        records.push(result?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Cursor},
        sync::{Arc, Mutex},
    };

    use reamp_types::ReampError;

    use super::*;
    use crate::{
        format::fixtures::{raw_file, raw_header, raw_record},
        termination::ExhaustInput,
    };

    /// Наблюдатель, складывающий события в общий вектор.
    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl DecodeObserver for Recorder {
        fn on_event(
            &mut self,
            event: &DecodeEvent<'_>,
        ) {
            let line = match event {
                DecodeEvent::HeaderParsed(h) => format!("header:{}", h.channel_count),
                DecodeEvent::Progress { records } => format!("progress:{records}"),
                DecodeEvent::Terminated { reason, records } => {
                    format!("terminated:{records}:{reason}")
                }
            };
            self.events.lock().unwrap().push(line);
        }
    }

    /// Источник, падающий после `ok_bytes` байт.
    struct Failing {
        data: Cursor<Vec<u8>>,
        ok_bytes: u64,
    }

    impl Read for Failing {
        fn read(
            &mut self,
            buf: &mut [u8],
        ) -> io::Result<usize> {
            if self.data.position() >= self.ok_bytes {
                return Err(io::Error::other("device unplugged"));
            }
            let left = (self.ok_bytes - self.data.position()) as usize;
            let n = buf.len().min(left);
            self.data.read(&mut buf[..n])
        }
    }

    fn increments(records: &[SampleRecord]) -> Vec<f64> {
        records.iter().map(|r| r.increment_ms).collect()
    }

    #[test]
    fn test_stops_at_first_repeat() {
        let raw = raw_file(
            1,
            0,
            &[
                (0.0, vec![10.0]),
                (1.0, vec![11.0]),
                (2.0, vec![12.0]),
                (2.0, vec![0.0]),
                (3.0, vec![13.0]),
            ],
        );

        let mut reader = ReampReader::new(Cursor::new(raw)).unwrap();
        let records = read_all_records(&mut reader).unwrap();

        assert_eq!(increments(&records), vec![0.0, 1.0, 2.0]);
        assert_eq!(
            reader.stop_reason(),
            Some(StopReason::Terminator { increment: 2.0 })
        );
        // Прочитано 3 записи + терминатор, запись inc=3 не тронута
        assert_eq!(reader.stats().bytes_consumed, 4 * 16);
    }

    #[test]
    fn test_round_trip_sanity() {
        let raw = raw_file(
            2,
            1_000_000,
            &[
                (0.0, vec![1.1, 2.2]),
                (500.0, vec![1.2, 2.3]),
                (500.0, vec![0.0, 0.0]),
            ],
        );

        let mut reader = ReampReader::new(Cursor::new(raw)).unwrap();
        assert_eq!(reader.header().start_time_s, 1000.0);

        let records = read_all_records(&mut reader).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].increment_ms, 500.0);
        assert_eq!(records[1].channel_values, vec![1.2, 2.3]);
    }

    #[test]
    fn test_truncated_tail_is_soft_stop() {
        let mut raw = raw_file(2, 0, &[(0.0, vec![1.0, 2.0]), (1.0, vec![3.0, 4.0])]);
        raw.extend_from_slice(&raw_record(2.0, &[5.0, 6.0])[..13]);

        let mut reader = ReampReader::new(Cursor::new(raw)).unwrap();
        let records = read_all_records(&mut reader).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(
            reader.stop_reason(),
            Some(StopReason::TruncatedRecord { trailing_bytes: 13 })
        );
        assert_eq!(reader.stats().trailing_bytes, 13);
    }

    #[test]
    fn test_end_of_input_without_terminator() {
        // Последняя физическая запись без терминатора всё равно выдаётся
        let raw = raw_file(1, 0, &[(0.0, vec![1.0]), (1.0, vec![2.0])]);

        let mut reader = ReampReader::new(Cursor::new(raw)).unwrap();
        assert_eq!(reader.by_ref().count(), 2);
        assert_eq!(reader.stop_reason(), Some(StopReason::EndOfInput));
    }

    #[test]
    fn test_header_only_file() {
        let raw = raw_file(3, 0, &[]);

        let mut reader = ReampReader::new(Cursor::new(raw)).unwrap();
        assert!(reader.next_record().is_none());
        assert_eq!(reader.stats().records, 0);
        assert_eq!(reader.stop_reason(), Some(StopReason::EndOfInput));
    }

    #[test]
    fn test_unsupported_version_before_records() {
        let mut raw = raw_header(3, 1, 10, 0);
        raw.extend_from_slice(&raw_record(0.0, &[1.0]));

        let result = ReampReader::new(Cursor::new(raw));
        assert!(matches!(
            result,
            Err(ReampError::UnsupportedVersion { found: 3, .. })
        ));
    }

    #[test]
    fn test_too_short_reports_available_bytes() {
        let raw = vec![4u8, 0, 0, 2, 0, 0];
        let result = ReampReader::new(Cursor::new(raw));

        assert!(matches!(
            result,
            Err(ReampError::TooShort {
                found: 6,
                expected: 512
            })
        ));
    }

    #[test]
    fn test_state_machine() {
        let raw = raw_file(0, 0, &[(0.0, vec![]), (0.0, vec![])]);
        let mut reader = ReampReader::new(Cursor::new(raw)).unwrap();

        assert_eq!(reader.state(), DecoderState::HeaderParsed);

        let record = reader.next_record().unwrap().unwrap();
        assert!(record.channel_values.is_empty());
        assert_eq!(reader.state(), DecoderState::Streaming);

        assert!(reader.next_record().is_none());
        assert!(matches!(reader.state(), DecoderState::Terminated(_)));

        // Перезапуска нет
        assert!(reader.next_record().is_none());
        assert_eq!(reader.stats().records, 1);
    }

    #[test]
    fn test_exhaust_input_policy() {
        let raw = raw_file(1, 0, &[(2.0, vec![1.0]), (2.0, vec![2.0]), (2.0, vec![3.0])]);

        let mut reader =
            ReampReader::with_policy(Cursor::new(raw), ExhaustInput, NoopObserver).unwrap();
        let records = read_all_records(&mut reader).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(reader.policy().name(), "exhaust-input");
    }

    #[test]
    fn test_observer_events() {
        let recorder = Recorder::default();
        let records: Vec<(f64, Vec<f64>)> = (0..5).map(|i| (i as f64, vec![0.5])).collect();
        let mut raw = raw_file(1, 0, &records);
        raw.extend_from_slice(&raw_record(4.0, &[0.0]));

        let mut reader = ReampReader::with_observer(Cursor::new(raw), recorder.clone()).unwrap();
        reader.set_progress_interval(2);
        assert_eq!(reader.by_ref().count(), 5);

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "header:1",
                "progress:2",
                "progress:4",
                "terminated:5:terminator record, increment 4",
            ]
        );
    }

    #[test]
    fn test_io_error_terminates_stream() {
        let raw = raw_file(1, 0, &[(0.0, vec![1.0]), (1.0, vec![2.0]), (2.0, vec![3.0])]);
        let src = Failing {
            data: Cursor::new(raw),
            ok_bytes: (REAMP_HEADER_SIZE + 16) as u64,
        };

        let mut reader = ReampReader::new(src).unwrap();
        assert!(reader.next_record().unwrap().is_ok());
        assert!(matches!(reader.next_record(), Some(Err(ReampError::Io(_)))));
        assert!(reader.next_record().is_none());
        assert_eq!(reader.stop_reason(), Some(StopReason::Failed));
    }
}
