use mirror_config::{init_tracing, LoggingConfig};
use pretty_assertions::assert_eq;
use tracing_subscriber::filter::LevelFilter;

fn logging(level: &str) -> LoggingConfig {
    LoggingConfig {
        level: level.to_owned(),
        json: false,
    }
}

#[test]
fn rust_log_directives_follow_the_configured_level() {
    let config = logging("warn");
    assert_eq!(
        config.directives(Some("mirror.synth=trace")),
        "warn,mirror.synth=trace"
    );
    assert_eq!(config.directives(Some("   ")), "warn");
    assert_eq!(config.directives(None), "warn");

    let filter = config.filter_with(Some("mirror.synth=trace"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
}

#[test]
fn invalid_rust_log_falls_back_to_the_configured_level() {
    let filter = logging("debug").filter_with(Some("mirror.synth=loud"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
}

#[test]
fn invalid_level_falls_back_to_rust_log_then_info() {
    let filter = logging("mirror=loud").filter_with(Some("error"));
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));

    let filter = logging("mirror=loud").filter_with(None);
    assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
}

#[test]
fn tracing_is_installed_at_most_once() {
    let config = LoggingConfig::default();
    init_tracing(&config);
    assert!(!init_tracing(&config));
    tracing::info!(target: "mirror.config", "still logging");
}
