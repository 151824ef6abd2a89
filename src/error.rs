use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::decode::Format;

/// Errors produced while decoding raw file content.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("{format} document is a {found}, expected a key/value mapping")]
    NotAMapping { format: Format, found: &'static str },

    #[error("{decoder} decoder failed: {message}")]
    Custom { decoder: String, message: String },

    #[error("all {} decoders failed:\n{}", .0.len(), .0)]
    Exhausted(DecodeAttempts),

    #[error("a multi decoder needs at least one candidate")]
    NoDecoders,

    #[error("unknown file format '{0}' (expected json, yaml or toml)")]
    UnknownFormat(String),
}

/// One failed decoder run inside a multi decoder.
#[derive(Debug)]
pub struct DecodeAttempt {
    pub decoder: String,
    pub error: DecodeError,
}

/// Every failed attempt of a multi decoder, in the order they were tried.
#[derive(Debug, Default)]
pub struct DecodeAttempts(Vec<DecodeAttempt>);

impl DecodeAttempts {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodeAttempt> {
        self.0.iter()
    }

    pub(crate) fn push(&mut self, decoder: String, error: DecodeError) {
        self.0.push(DecodeAttempt { decoder, error });
    }
}

impl fmt::Display for DecodeAttempts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, attempt) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}: {}", attempt.decoder, attempt.error)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TagfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode { path: PathBuf, source: DecodeError },

    #[error("Unknown key '{key}' in {path}")]
    UnknownKey { key: String, path: PathBuf },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<TagfigError>),

    #[error("Two fields resolve to the same option id '{0}'")]
    DuplicateOption(String),

    #[error("Option '{0}' has an empty path segment; field names must be non-empty")]
    EmptyOptionId(String),

    #[error("Invalid decoder selection: {0}")]
    Decoder(#[from] DecodeError),

    #[error("App name is required to discover config files; call .app_name() or .config_file() on the builder")]
    AppNameRequired,
}

impl TagfigError {
    /// True when the error means the file was absent rather than unreadable or invalid.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TagfigError::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_formats_correctly() {
        let err = TagfigError::UnknownKey {
            key: "database.typo".into(),
            path: "/home/user/.config/myapp/myapp.conf".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("database.typo"));
        assert!(msg.contains("myapp.conf"));
    }

    #[test]
    fn not_found_is_distinct_from_decode_failure() {
        let missing = TagfigError::FileNotFound {
            path: "/nope.conf".into(),
        };
        let invalid = TagfigError::Decode {
            path: "/bad.conf".into(),
            source: DecodeError::NoDecoders,
        };
        assert!(missing.is_not_found());
        assert!(!invalid.is_not_found());
        assert!(missing.to_string().contains("not found"));
    }

    #[test]
    fn exhausted_lists_every_attempt() {
        let mut attempts = DecodeAttempts::default();
        attempts.push(
            "json".into(),
            DecodeError::Custom {
                decoder: "json".into(),
                message: "first".into(),
            },
        );
        attempts.push(
            "toml".into(),
            DecodeError::Custom {
                decoder: "toml".into(),
                message: "second".into(),
            },
        );
        let msg = DecodeError::Exhausted(attempts).to_string();
        assert!(msg.contains("all 2 decoders failed"));
        assert!(msg.contains("first"));
        assert!(msg.contains("second"));
    }

    #[test]
    fn app_name_required_formats() {
        let err = TagfigError::AppNameRequired;
        assert!(err.to_string().contains("app_name"));
    }
}
