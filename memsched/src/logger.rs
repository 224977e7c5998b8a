use log::{Record, Metadata, SetLoggerError, LevelFilter};

/// Writes every enabled record to stderr, so that simulation
/// diagnostics never mix with the results printed on stdout.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Installs the logger. `verbose` lowers the threshold from
/// `Info` to `Debug`. Fails if some logger is already installed.
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };

    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(level))
}
