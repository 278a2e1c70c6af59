use crate::errors::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub suite: SuiteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    pub headless: bool,
    pub viewport: Viewport,
    pub user_agent: Option<String>,
    pub args: Vec<String>,
    /// Upper bound on page-load waits; applied as the tab's default timeout.
    pub navigation_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// The application surface under test. Selectors live with the page objects;
/// URLs and fixed form values live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub base_url: String,
    pub landing_path: String,
    pub change_password_path: String,
    pub security_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    pub failure_policy: FailurePolicy,
    pub element_timeout_ms: u64,
}

/// What to do with the rest of the credential list once one credential's
/// iteration has failed. The password committed by a passing iteration is the
/// next iteration's precondition, so aborting early is a legitimate choice;
/// continuing still attempts every credential and reports each outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    ContinueOnFailure,
    AbortOnFailure,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            HarnessError::Configuration(format!("{}: {}", path.display(), e))
        })
    }
}

impl TargetConfig {
    /// Joins a relative surface path against the base URL.
    pub fn resolve(&self, path: &str) -> std::result::Result<String, url::ParseError> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(path)?.to_string())
    }

    pub fn login_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport: Viewport::default(),
            user_agent: None,
            args: vec![],
            navigation_timeout_ms: 30000,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "https://login.salesforce.com".to_string(),
            landing_path: "/home".to_string(),
            change_password_path: "/_ui/core/userprofile/ui/ChangePassword?retURL=/home"
                .to_string(),
            security_answer: "Juno Beach".to_string(),
        }
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::ContinueOnFailure,
            element_timeout_ms: 10000,
        }
    }
}
