use std::borrow::Cow;
use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Whether `init_tracing` managed to install the subscriber.
static INSTALLED: OnceLock<bool> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or an `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// The configured level as filter directives. `warning` is accepted for
    /// `warn`; anything that is not a bare level is passed through.
    fn level_directives(&self) -> Cow<'_, str> {
        let level = self.level.trim();
        if level.is_empty() {
            return Cow::Borrowed("info");
        }
        if level.eq_ignore_ascii_case("warning") {
            return Cow::Borrowed("warn");
        }
        match level.parse::<LevelFilter>() {
            Ok(filter) => Cow::Owned(filter.to_string().to_ascii_lowercase()),
            Err(_) => Cow::Borrowed(level),
        }
    }

    /// Directive string for the configured level followed by `rust_log`, so
    /// that `RUST_LOG` entries win for the targets they name.
    pub fn directives(&self, rust_log: Option<&str>) -> String {
        let level = self.level_directives();
        match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
            Some(env) => format!("{level},{env}"),
            None => level.into_owned(),
        }
    }

    /// Filter for the configured level merged with `rust_log`.
    ///
    /// An unparsable combination falls back to `rust_log` alone, then to the
    /// configured level, then to `info`.
    pub fn filter_with(&self, rust_log: Option<&str>) -> EnvFilter {
        let candidates = [
            Some(self.directives(rust_log)),
            rust_log.map(str::to_owned),
            Some(self.directives(None)),
        ];
        for directives in candidates.into_iter().flatten() {
            match EnvFilter::try_new(&directives) {
                Ok(filter) => return filter,
                Err(err) => tracing::debug!(
                    target: "mirror.config",
                    directives = %directives,
                    error = %err,
                    "rejected log filter"
                ),
            }
        }
        EnvFilter::default().add_directive(LevelFilter::INFO.into())
    }

    /// Filter for the configured level merged with the `RUST_LOG` environment variable.
    pub fn env_filter(&self) -> EnvFilter {
        self.filter_with(std::env::var("RUST_LOG").ok().as_deref())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

/// Installs the global `tracing` subscriber on stderr.
///
/// Returns `true` only for the call that installed it. Later calls, and
/// calls made after another subscriber was set, do nothing.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut installed_now = false;
    INSTALLED.get_or_init(|| {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(config.env_filter())
            .with_target(true)
            .with_writer(std::io::stderr);
        let result = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        installed_now = result.is_ok();
        installed_now
    });
    installed_now
}
