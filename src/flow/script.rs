use crate::core::{SessionDriver, SuiteConfig, TargetConfig};
use crate::errors::DriverError;
use crate::flow::pages::{ChangePasswordPage, HomePage, LoginPage};
use crate::types::{Credential, FlowStatus, RunOutcome, Step, VerificationKind};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, warn};

/// One credential's workflow, start to finish. A trait so the runner can be
/// unit-tested against a scripted flow instead of a browser.
#[async_trait]
pub trait FlowScript: Send + Sync {
    async fn execute(
        &self,
        driver: &dyn SessionDriver,
        credential: &Credential,
        current_password: &str,
        new_password: &str,
    ) -> RunOutcome;
}

/// The canonical login → change-password → logout sequence.
///
/// Steps run strictly in order; the first failure skips the remainder for
/// that credential and is recorded with the step name. Cookies are cleared
/// after every iteration, passing or not, so the next credential starts from
/// a clean session.
pub struct RotationFlow {
    target: TargetConfig,
    suite: SuiteConfig,
}

impl RotationFlow {
    pub fn new(target: TargetConfig, suite: SuiteConfig) -> Self {
        Self { target, suite }
    }

    fn step_failed(step: Step, err: DriverError) -> FlowStatus {
        FlowStatus::StepFailed {
            step,
            reason: err.to_string(),
        }
    }

    async fn run_steps(
        &self,
        driver: &dyn SessionDriver,
        credential: &Credential,
        current_password: &str,
        new_password: &str,
    ) -> FlowStatus {
        let username = credential.username.as_str();
        let wait = self.suite.element_timeout_ms;

        if let Err(e) = driver.navigate(self.target.login_url()).await {
            return Self::step_failed(Step::OpenLogin, e);
        }

        if let Err(e) = LoginPage::login(driver, username, current_password).await {
            return Self::step_failed(Step::SubmitCredentials, e);
        }

        match HomePage::is_logged_in(driver, wait).await {
            Ok(true) => debug!(username, "login verified"),
            Ok(false) => {
                return FlowStatus::VerificationFailed {
                    kind: VerificationKind::LoginVerificationFailed,
                }
            }
            Err(e) => return Self::step_failed(Step::VerifyLogin, e),
        }

        // Deep link; the flow never hunts for a "change password" control.
        let change_url = match self.target.resolve(&self.target.change_password_path) {
            Ok(url) => url,
            Err(e) => {
                return FlowStatus::StepFailed {
                    step: Step::OpenChangePassword,
                    reason: e.to_string(),
                }
            }
        };
        if let Err(e) = driver.navigate(&change_url).await {
            return Self::step_failed(Step::OpenChangePassword, e);
        }
        match driver
            .wait_for_visible(ChangePasswordPage::CURRENT_PASSWORD_INPUT, wait)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                return FlowStatus::StepFailed {
                    step: Step::OpenChangePassword,
                    reason: format!("change-password form did not appear within {}ms", wait),
                }
            }
            Err(e) => return Self::step_failed(Step::OpenChangePassword, e),
        }

        if let Err(e) = ChangePasswordPage::change_password(
            driver,
            current_password,
            new_password,
            &self.target.security_answer,
        )
        .await
        {
            return Self::step_failed(Step::SubmitPasswordChange, e);
        }

        let landing_url = match self.target.resolve(&self.target.landing_path) {
            Ok(url) => url,
            Err(e) => {
                return FlowStatus::StepFailed {
                    step: Step::ReturnHome,
                    reason: e.to_string(),
                }
            }
        };
        if let Err(e) = driver.navigate(&landing_url).await {
            return Self::step_failed(Step::ReturnHome, e);
        }

        match HomePage::logout(driver, wait).await {
            Ok(true) => {}
            Ok(false) => {
                return FlowStatus::StepFailed {
                    step: Step::Logout,
                    reason: format!("logout control did not appear within {}ms", wait),
                }
            }
            Err(e) => return Self::step_failed(Step::Logout, e),
        }

        if let Err(e) = driver.navigate(self.target.login_url()).await {
            return Self::step_failed(Step::VerifyLogout, e);
        }
        match driver
            .wait_for_visible(LoginPage::USERNAME_INPUT, wait)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                return FlowStatus::VerificationFailed {
                    kind: VerificationKind::LogoutVerificationFailed,
                }
            }
            Err(e) => return Self::step_failed(Step::VerifyLogout, e),
        }

        FlowStatus::Passed
    }
}

#[async_trait]
impl FlowScript for RotationFlow {
    async fn execute(
        &self,
        driver: &dyn SessionDriver,
        credential: &Credential,
        current_password: &str,
        new_password: &str,
    ) -> RunOutcome {
        let started_at = Utc::now();
        let start = Instant::now();

        let status = self
            .run_steps(driver, credential, current_password, new_password)
            .await;

        // Session reset happens regardless of outcome.
        if let Err(err) = driver.clear_cookies().await {
            warn!(username = %credential.username, %err, "failed to clear cookies");
        }

        RunOutcome {
            username: credential.username.clone(),
            status,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}
