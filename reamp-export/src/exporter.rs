use std::{
    fs::{self, File},
    io::{self, Read, Write},
    time::Instant,
};

use encoding_rs::Encoding;
use log::info;
use reamp_core::{LogObserver, ReampReader};

use crate::{
    render::format_utc, resolve_encoding, ExportConfig, ExportError, ExportResult, ExportSummary,
    NumberLocale, RowRenderer, TranscodingWriter,
};

/// Конвертирует один .reamp файл в CSV.
pub struct Exporter {
    config: ExportConfig,
    locale: NumberLocale,
    encoding: &'static Encoding,
}

impl Exporter {
    /// Создаёт экспортёр, заранее проверяя локаль и кодировку.
    pub fn new(config: ExportConfig) -> ExportResult<Self> {
        let locale = NumberLocale::resolve(&config.locale)?;
        let encoding = resolve_encoding(&config.encoding)?;

        Ok(Self {
            config,
            locale,
            encoding,
        })
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Запускает экспорт. Блокируется до конца потока записей.
    ///
    /// Выходной файл создаётся только после успешного разбора заголовка.
    /// При ошибке посреди потока уже записанные строки остаются на диске.
    pub fn run(&self) -> ExportResult<ExportSummary> {
        let cfg = &self.config;
        let started = Instant::now();

        let input = File::open(&cfg.input_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ExportError::InputNotFound(cfg.input_path.clone()),
            _ => ExportError::Io(e),
        })?;
        let input_bytes = input.metadata()?.len();
        info!("  Input size    : {input_bytes} B");
        info!(
            "  Number locale : {} (decimal '{}')",
            self.locale.name(),
            self.locale.decimal_separator()
        );
        info!("  Output charset: {}", self.encoding.name());

        let mut reader = ReampReader::with_observer(input, LogObserver)?;
        reader.set_progress_interval(cfg.progress_interval);

        let header = reader.header().clone();
        if let Some(start) = format_utc(header.start_time_s) {
            info!("  Start (UTC)   : {start}");
        }

        let renderer = RowRenderer::new(
            &header,
            self.locale.clone(),
            cfg.time_mode,
            cfg.increment_unit,
        );

        let output = File::create(&cfg.output_path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(cfg.delimiter.as_byte())
            .terminator(csv::Terminator::CRLF)
            .from_writer(TranscodingWriter::new(output, self.encoding));

        let streamed = write_rows(&mut reader, &renderer, &mut writer, header.channel_count);

        // Сбрасываем буферы и при ошибке: частичный вывод допустим
        let flushed = writer.flush();
        let closed = match writer.into_inner() {
            Ok(sink) => sink.finish().map(drop),
            Err(e) => Err(io::Error::new(e.error().kind(), e.to_string())),
        };
        streamed?;
        flushed?;
        closed?;

        let stats = reader.stats();
        let summary = ExportSummary {
            duration_secs: started.elapsed().as_secs_f64(),
            records_written: stats.records,
            stop_reason: reader.stop_reason(),
            last_time_s: stats.last_increment.map(|inc| renderer.absolute_time_s(inc)),
            input_bytes,
            output_bytes: fs::metadata(&cfg.output_path)?.len(),
        };

        Ok(summary)
    }
}

fn write_rows<R: Read, W: Write>(
    reader: &mut ReampReader<R>,
    renderer: &RowRenderer,
    writer: &mut csv::Writer<W>,
    channel_count: u8,
) -> ExportResult<()> {
    writer.write_record(RowRenderer::header_row(channel_count))?;

    let mut row = Vec::with_capacity(channel_count as usize + 1);

    while let Some(record) = reader.next_record() {
        let record = record?;
        renderer.render_row(&record, &mut row)?;
        writer.write_record(&row)?;
    }

    Ok(())
}
