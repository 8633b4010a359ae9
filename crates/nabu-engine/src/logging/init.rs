use std::io::Write as _;
use std::sync::Once;

use log::LevelFilter;

/// Filter used when neither the config nor `RUST_LOG` names one.
pub const DEFAULT_FILTER: &str = "info";

/// Logger configuration.
///
/// `filter` uses `env_logger` directive syntax, e.g. `"nabu_ui=debug,warn"`.
/// When it is `None`, `RUST_LOG` is consulted, then [`DEFAULT_FILTER`].
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    pub color: env_logger::WriteStyle,
    /// Prefix every line with wall-clock milliseconds.
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: None, color: env_logger::WriteStyle::Auto, timestamps: false }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: Option<String>) -> Self {
        Self { filter, ..Self::default() }
    }

    fn resolved_filter(&self) -> String {
        self.filter
            .clone()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
///
/// Lines read `LEVEL target: message`, optionally behind a timestamp. If an
/// embedding host already installed a logger, that one is kept.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolved_filter();
        let mut builder = env_logger::Builder::new();
        builder.filter_level(LevelFilter::Off).parse_filters(&filter).write_style(config.color);

        let timestamps = config.timestamps;
        builder.format(move |buf, record| {
            let style = buf.default_level_style(record.level());
            if timestamps {
                let ts = buf.timestamp_millis();
                write!(buf, "{ts} ")?;
            }
            writeln!(
                buf,
                "{style}{:<5}{style:#} {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        });

        if builder.try_init().is_ok() {
            log::debug!("logging initialized ({filter})");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let cfg = LoggingConfig::with_filter(Some("nabu_ui=trace".into()));
        assert_eq!(cfg.resolved_filter(), "nabu_ui=trace");
    }

    #[test]
    fn blank_filter_is_ignored() {
        let cfg = LoggingConfig::with_filter(Some("  ".into()));
        let got = cfg.resolved_filter();
        assert!(!got.trim().is_empty());
    }
}
