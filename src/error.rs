//! Configuration error types.
//!
//! The simulation tick itself never fails: corrupted bodies are culled and
//! stale references are ignored. The only fallible surface is building an
//! engine from a configuration, which goes through [`ConfigError`].

use std::fmt;

/// Errors raised while loading or validating an [`crate::EngineConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(std::io::Error),

    /// The config text is not valid JSON for `EngineConfig`.
    Parse(serde_json::Error),

    /// A value is outside its accepted range.
    Invalid {
        /// Field name (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the constraint.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read engine config: {}", err),
            ConfigError::Parse(err) => write!(f, "failed to parse engine config: {}", err),
            ConfigError::Invalid {
                name,
                value,
                reason,
            } => write!(f, "config value '{}' = {} is invalid: {}", name, value, reason),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::Invalid {
            name: "cell_size",
            value: -1.0,
            reason: "must be positive",
        };
        assert_eq!(
            err.to_string(),
            "config value 'cell_size' = -1 is invalid: must be positive"
        );
    }

    #[test]
    fn test_parse_error_has_source() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("failed to parse engine config"));
    }
}
