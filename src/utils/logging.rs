use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Log target of the filter catalog, compiler and URL codec
pub const FILTERS_TARGET: &str = "flowfilter::filters";

/// Environment variable holding extra `env_logger` directives
pub const LOG_ENV: &str = "FLOWFILTER_LOG";

/// Logger builder: `level` for everything, `filters_level` overriding the
/// filter modules, then any directives from `FLOWFILTER_LOG`
pub fn build_logger(level: LevelFilter, filters_level: Option<LevelFilter>) -> Builder {
    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                short_target(record.target()),
                record.args()
            )
        })
        .filter(None, level);
    if let Some(filters_level) = filters_level {
        builder.filter_module(FILTERS_TARGET, filters_level);
    }
    builder.parse_env(LOG_ENV);
    builder
}

/// Initialize the global logger
pub fn init_logger(level: LevelFilter, filters_level: Option<LevelFilter>) {
    build_logger(level, filters_level).init();
}

/// Drop the crate prefix from our own targets
fn short_target(target: &str) -> &str {
    target.strip_prefix("flowfilter::").unwrap_or(target)
}

/// Get log level from string
pub fn get_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_get_log_level() {
        assert_eq!(get_log_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(get_log_level("off"), LevelFilter::Off);
        assert_eq!(get_log_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_filters_level_overrides_global_level() {
        let logger = build_logger(LevelFilter::Warn, Some(LevelFilter::Debug)).build();
        assert!(enabled(&logger, "flowfilter::filters::query", Level::Debug));
        assert!(!enabled(&logger, "flowfilter::filters::query", Level::Trace));
        assert!(!enabled(&logger, "flowfilter::api::handlers", Level::Info));
        assert!(enabled(&logger, "actix_server::builder", Level::Warn));
    }

    #[test]
    fn test_global_level_applies_without_override() {
        let logger = build_logger(LevelFilter::Info, None).build();
        assert!(enabled(&logger, "flowfilter::filters::url", Level::Info));
        assert!(!enabled(&logger, "flowfilter::filters::url", Level::Debug));
    }

    #[test]
    fn test_short_target() {
        assert_eq!(short_target("flowfilter::filters::query"), "filters::query");
        assert_eq!(short_target("actix_server::builder"), "actix_server::builder");
    }
}
