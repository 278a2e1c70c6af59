use std::path::PathBuf;
use thiserror::Error;

/// Fixture problems are fatal to the whole run and are reported before any
/// browser interaction begins.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("fixture file {path} could not be read: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("fixture file {path} has no '{column}' column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("fixture file {path} contains no records")]
    Empty { path: PathBuf },

    #[error("secret file {path} is empty")]
    EmptySecret { path: PathBuf },
}

/// Session driver interaction failures. The flow wraps these with the step
/// name and acting username before they reach a report.
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("tab creation failed: {0}")]
    TabCreationFailed(String),

    #[error("no active tab")]
    NoActiveTab,

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),

    #[error("javascript execution failed: {0}")]
    JavaScriptFailed(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
