use flexi_logger::{DeferredNow, FlexiLoggerError, LogSpecification, Logger, LoggerHandle, style};
use log::{LevelFilter, Record};
use std::io::Write;

pub fn level_for(verbose: usize) -> LevelFilter {
  match verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  }
}

/// Starts logging to stderr. Keep the returned handle alive for the
/// lifetime of the program.
pub fn init(verbose: usize) -> Result<LoggerHandle, FlexiLoggerError> {
  let log_specification = LogSpecification::builder()
    .default(level_for(verbose))
    .build();
  Logger::with(log_specification)
    .format(format_log_message)
    .start()
}

pub fn format_log_message(
  w: &mut dyn Write,
  now: &mut DeferredNow,
  record: &Record,
) -> std::io::Result<()> {
  let message = record.args().to_string();
  let level = record.level();
  let timestamp = now.now().format("%H:%M:%S").to_string();
  let styled_level = style(level).paint(level.to_string());

  writeln!(w, "[ {styled_level} ] {timestamp} {message}")
}
