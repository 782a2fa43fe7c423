use std::path::PathBuf;

use thiserror::Error;

/// Why a raw command-line value could not be stored in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("parse error")]
    Syntax,
    #[error("value out of range")]
    Range,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("flag redefined: {0}")]
    Redefined(String),
    #[error("invalid flag name {0:?}")]
    BadName(String),
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    #[error("flag provided but not defined: -{0}")]
    Undefined(String),
    #[error("flag needs an argument: -{0}")]
    MissingArgument(String),
    #[error("invalid value {value:?} for flag -{name}: {source}")]
    InvalidValue {
        name: String,
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("invalid boolean value {value:?} for -{name}: {source}")]
    InvalidBool {
        name: String,
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("no such flag -{0}")]
    NoSuchFlag(String),
    /// `-h` or `-help` was given and no flag of that name is defined.
    #[error("flag: help requested")]
    Help,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("failed to read defaults file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse defaults: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported defaults file {0:?}: only .toml files are supported")]
    UnsupportedFormat(PathBuf),
    #[error("unsupported value for flag {key}: expected a string, an integer or a boolean")]
    UnsupportedValue { key: String },
    #[error("defaults set the same field twice: {first} and {second}")]
    SameField { first: String, second: String },
    #[error(transparent)]
    Flag(#[from] Error),
}
