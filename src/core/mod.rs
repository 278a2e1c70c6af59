pub mod config;
pub mod driver;

pub use config::{BrowserConfig, Config, FailurePolicy, SuiteConfig, TargetConfig, Viewport};
pub use driver::SessionDriver;
