use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use once_cell::sync::Lazy;
use tracing::Level;

static LOG_CONFIG: OnceLock<LogConfig> = OnceLock::new();
static DEFAULT_CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::default);

/// The config installed by `init_logging`, or a WARN-everywhere default
/// before that (tests, library use without a runtime).
pub fn get_log_config() -> &'static LogConfig {
    LOG_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}

/// Per-scope verbosity parsed from a directive string like
/// `warn,selection=debug,teleport=trace`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    default_level: Level,
    scope_levels: HashMap<String, Level>,
}

impl LogConfig {
    pub fn new() -> Self {
        Self {
            default_level: Level::WARN,
            scope_levels: HashMap::new(),
        }
    }

    pub fn from_env(env_var_name: &str) -> Self {
        std::env::var(env_var_name)
            .map(|directives| Self::parse(&directives))
            .unwrap_or_default()
    }

    /// Unknown levels and malformed directives are skipped; the last
    /// directive for a scope wins.
    pub fn parse(directives: &str) -> Self {
        let mut config = Self::new();

        for directive in directives.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }

            match directive.split_once('=') {
                Some((scope, level)) => {
                    let scope = scope.trim();
                    if scope.is_empty() {
                        continue;
                    }
                    if let Ok(level) = Level::from_str(level.trim()) {
                        config.scope_levels.insert(scope.to_string(), level);
                    }
                }
                None => {
                    if let Ok(level) = Level::from_str(directive) {
                        config.default_level = level;
                    }
                }
            }
        }

        config
    }

    pub fn should_log(&self, scope: &str, level: Level) -> bool {
        let threshold = self.scope_levels.get(scope).unwrap_or(&self.default_level);
        level <= *threshold
    }

    pub fn default_level(&self) -> Level {
        self.default_level
    }

    pub fn scope_level(&self, scope: &str) -> Option<Level> {
        self.scope_levels.get(scope).copied()
    }

    pub fn set_default_level(&mut self, level: Level) {
        self.default_level = level;
    }

    pub fn set_scope_level(&mut self, scope: impl Into<String>, level: Level) {
        self.scope_levels.insert(scope.into(), level);
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Install the fmt subscriber and read scope levels from `env_var_name`,
/// e.g. `init_logging("XR_LOG")`. `RUST_LOG` still filters by target when
/// set; otherwise scope levels alone decide.
pub fn init_logging(env_var_name: &str) -> LogConfig {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trace")),
        )
        .with_target(false)
        .try_init();

    let config = LogConfig::from_env(env_var_name);
    // First call wins
    LOG_CONFIG.set(config.clone()).ok();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_level() {
        let config = LogConfig::parse("debug");
        assert_eq!(config.default_level(), Level::DEBUG);
    }

    #[test]
    fn test_parse_scope_levels() {
        let config = LogConfig::parse("warn, selection=debug ,teleport=TRACE");

        assert_eq!(config.default_level(), Level::WARN);
        assert_eq!(config.scope_level("selection"), Some(Level::DEBUG));
        assert_eq!(config.scope_level("teleport"), Some(Level::TRACE));
    }

    #[test]
    fn test_parse_ignores_garbage() {
        let config = LogConfig::parse("loud,=info,scene=chatty,,input=error");

        assert_eq!(config.default_level(), Level::WARN);
        assert_eq!(config.scope_level("scene"), None);
        assert_eq!(config.scope_level("input"), Some(Level::ERROR));
    }

    #[test]
    fn test_should_log() {
        let mut config = LogConfig::new();
        config.set_scope_level("teleport", Level::DEBUG);

        assert!(config.should_log("scene", Level::ERROR));
        assert!(config.should_log("scene", Level::WARN));
        assert!(!config.should_log("scene", Level::INFO));

        assert!(config.should_log("teleport", Level::DEBUG));
        assert!(!config.should_log("teleport", Level::TRACE));
    }
}
