use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};
use reamp_export::{
    default_output_path, Delimiter, ExportConfig, Exporter, IncrementUnit, TimeMode, EXIT_OK,
    EXIT_USAGE,
};

#[derive(Parser, Debug)]
#[command(
    name = "reamp2csv",
    version = env!("CARGO_PKG_VERSION"),
    about = "Converts Reamp datafile into CSV format",
    long_about = None,
)]
struct Cli {
    /// Входной *.reamp файл
    input_file: PathBuf,
    /// Выходной файл (по умолчанию: <input_file>.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Локаль для десятичного разделителя
    #[arg(short, long, default_value = "German")]
    locale: String,
    /// Кодировка выходного файла
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,
    /// Разделитель полей: , или ;
    #[arg(short, long, default_value = ";")]
    delimiter: Delimiter,
    /// Колонка времени: relative, timestamp, unix
    #[arg(short, long, default_value = "relative")]
    time: TimeMode,
    /// Единица инкремента при вычислении абсолютного времени: seconds, milliseconds
    #[arg(long, default_value = "seconds")]
    increment_unit: IncrementUnit,
    /// Подробный журнал
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_OK };
            // Вывод help/version/ошибки делает сам clap
            let _ = e.print();
            std::process::exit(code);
        }
    };

    let level = if cli.verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input_file));

    let config = ExportConfig {
        input_path: cli.input_file.clone(),
        output_path,
        delimiter: cli.delimiter,
        encoding: cli.encoding.clone(),
        time_mode: cli.time,
        locale: cli.locale.clone(),
        increment_unit: cli.increment_unit,
        ..ExportConfig::default()
    };

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Input         : {:?}", config.input_path);
    info!("  Output        : {:?}", config.output_path);
    info!("  Locale        : {}", config.locale);
    info!("  Delimiter     : {}", config.delimiter);
    info!("  Encoding      : {}", config.encoding);
    info!("  Time column   : {}", config.time_mode);
    info!("  Increment unit: {}", config.increment_unit);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let exporter = match Exporter::new(config) {
        Ok(e) => e,
        Err(e) => {
            error!("{e}");
            std::process::exit(e.exit_code());
        }
    };

    let summary = match exporter.run() {
        Ok(s) => s,
        Err(e) => {
            error!("Export of {:?} failed: {e}", exporter.config().input_path);
            std::process::exit(e.exit_code());
        }
    };

    info!("\n{summary}");

    if summary.was_truncated() {
        warn!("⚠ Input ended with a partial record; the last sample may be missing");
    }

    info!("✓ Export complete: {:?}", exporter.config().output_path);
}
