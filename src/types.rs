use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the usernames fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
}

impl Credential {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// The ordered steps of the rotation flow. Step order is fixed; a failure
/// at any step skips the remainder of that credential's iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    OpenLogin,
    SubmitCredentials,
    VerifyLogin,
    OpenChangePassword,
    SubmitPasswordChange,
    ReturnHome,
    Logout,
    VerifyLogout,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::OpenLogin => "open_login",
            Step::SubmitCredentials => "submit_credentials",
            Step::VerifyLogin => "verify_login",
            Step::OpenChangePassword => "open_change_password",
            Step::SubmitPasswordChange => "submit_password_change",
            Step::ReturnHome => "return_home",
            Step::Logout => "logout",
            Step::VerifyLogout => "verify_logout",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A post-condition that was checked but not observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationKind {
    LoginVerificationFailed,
    LogoutVerificationFailed,
}

impl fmt::Display for VerificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationKind::LoginVerificationFailed => f.write_str("login verification failed"),
            VerificationKind::LogoutVerificationFailed => f.write_str("logout verification failed"),
        }
    }
}

/// Tagged result of one credential's flow. Step failures and verification
/// failures are data, not unwinding, so the runner can decide per-credential
/// continuation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowStatus {
    Passed,
    StepFailed { step: Step, reason: String },
    VerificationFailed { kind: VerificationKind },
}

/// Pass/fail record for one credential's iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub username: String,
    pub status: FlowStatus,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl RunOutcome {
    pub fn passed(&self) -> bool {
        matches!(self.status, FlowStatus::Passed)
    }

    /// Human-readable failure reason, carrying step name and username so the
    /// failure is attributable without re-running.
    pub fn failure_reason(&self) -> Option<String> {
        match &self.status {
            FlowStatus::Passed => None,
            FlowStatus::StepFailed { step, reason } => Some(format!(
                "step '{}' failed for {}: {}",
                step, self.username, reason
            )),
            FlowStatus::VerificationFailed { kind } => {
                Some(format!("{} for {}", kind, self.username))
            }
        }
    }
}
