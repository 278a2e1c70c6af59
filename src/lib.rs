pub mod browser;
pub mod core;
pub mod errors;
pub mod fixtures;
pub mod flow;
pub mod runner;
pub mod types;

pub use browser::ChromeSession;
pub use self::core::{Config, FailurePolicy, SessionDriver};
pub use errors::{DriverError, FixtureError, HarnessError};
pub use fixtures::FixtureSet;
pub use flow::{FlowScript, RotationFlow};
pub use runner::{RunSummary, Runner};
pub use types::*;
