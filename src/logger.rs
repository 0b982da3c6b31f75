//! `log` sinks for the two runners.
//!
//! The library only emits through the `log` facade; a binary picks a sink
//! at startup. Without one (unit tests), records are dropped.

use log::LevelFilter;

#[cfg(feature = "cortex-m-demo")]
pub use semihosting::SemihostingLogger;

#[cfg(feature = "std")]
pub use stderr::StderrLogger;

/// Install the semihosting sink. Call once before starting the scheduler.
#[cfg(feature = "cortex-m-demo")]
pub fn init_semihosting(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    static LOGGER: SemihostingLogger = SemihostingLogger;
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Install the stderr sink.
#[cfg(feature = "std")]
pub fn init_stderr(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    static LOGGER: StderrLogger = StderrLogger;
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// Parse a level name, falling back to `default` on anything unknown.
pub fn parse_level(name: Option<&str>, default: LevelFilter) -> LevelFilter {
    name.and_then(|n| n.trim().parse().ok()).unwrap_or(default)
}

#[cfg(feature = "cortex-m-demo")]
mod semihosting {
    use cortex_m_semihosting::hprintln;
    use log::{Log, Metadata, Record};

    /// Writes records to the host console through semihosting.
    /// Slow (each line traps to the debugger), so keep the level at info.
    pub struct SemihostingLogger;

    impl Log for SemihostingLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                let _ = hprintln!("[{}] {}", record.level(), record.args());
            }
        }

        fn flush(&self) {}
    }
}

#[cfg(feature = "std")]
mod stderr {
    use std::io::Write;

    use log::{Log, Metadata, Record};

    pub struct StderrLogger;

    impl Log for StderrLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                let _ = writeln!(
                    std::io::stderr().lock(),
                    "[{:<5} {}] {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
        }

        fn flush(&self) {
            let _ = std::io::stderr().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!(parse_level(Some("debug"), LevelFilter::Info), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" TRACE "), LevelFilter::Info), LevelFilter::Trace);
        assert_eq!(parse_level(Some("loud"), LevelFilter::Warn), LevelFilter::Warn);
        assert_eq!(parse_level(None, LevelFilter::Info), LevelFilter::Info);
    }
}
