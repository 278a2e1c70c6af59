use crate::core::{FailurePolicy, SessionDriver};
use crate::flow::FlowScript;
use crate::types::{Credential, RunOutcome};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Drives the flow once per credential, strictly in file order.
///
/// Iterations are not independent: the new password committed by a passing
/// iteration is the current password of the next one. The threaded value is
/// an explicit local here, never shared state, and it only advances on a
/// fully-passing iteration.
pub struct Runner<F: FlowScript> {
    flow: F,
    policy: FailurePolicy,
}

impl<F: FlowScript> Runner<F> {
    pub fn new(flow: F, policy: FailurePolicy) -> Self {
        Self { flow, policy }
    }

    pub async fn run(
        &self,
        driver: &dyn SessionDriver,
        credentials: &[Credential],
        initial_password: &str,
        new_password: &str,
    ) -> RunSummary {
        let started_at = Utc::now();
        let mut current_password = initial_password.to_string();
        let mut outcomes = Vec::with_capacity(credentials.len());

        for credential in credentials {
            info!(username = %credential.username, "starting credential iteration");

            let outcome = self
                .flow
                .execute(driver, credential, &current_password, new_password)
                .await;

            if outcome.passed() {
                // Commit: the next iteration's precondition is the password
                // this iteration just set.
                current_password = new_password.to_string();
                info!(
                    username = %credential.username,
                    duration_ms = outcome.duration_ms,
                    "credential iteration passed"
                );
            } else if let Some(reason) = outcome.failure_reason() {
                warn!(%reason, "credential iteration failed");
            }

            let failed = !outcome.passed();
            outcomes.push(outcome);

            if failed && self.policy == FailurePolicy::AbortOnFailure {
                warn!("abort-on-failure policy set, skipping remaining credentials");
                break;
            }
        }

        RunSummary {
            outcomes,
            started_at,
            finished_at: Utc::now(),
        }
    }
}

/// Everything a run produced, in input order.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcomes: Vec<RunOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DriverResult;
    use crate::types::{FlowStatus, Step};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// The runner never inspects the driver itself, so tests hand it a no-op.
    struct NoopDriver;

    #[async_trait]
    impl SessionDriver for NoopDriver {
        async fn navigate(&self, _url: &str) -> DriverResult<()> {
            Ok(())
        }
        async fn set_value(&self, _selector: &str, _value: &str) -> DriverResult<()> {
            Ok(())
        }
        async fn click(&self, _selector: &str) -> DriverResult<()> {
            Ok(())
        }
        async fn is_visible(&self, _selector: &str) -> DriverResult<bool> {
            Ok(true)
        }
        async fn wait_for_visible(&self, _selector: &str, _timeout_ms: u64) -> DriverResult<bool> {
            Ok(true)
        }
        async fn clear_cookies(&self) -> DriverResult<()> {
            Ok(())
        }
        async fn current_url(&self) -> DriverResult<String> {
            Ok("about:blank".to_string())
        }
        async fn close(&mut self) -> DriverResult<()> {
            Ok(())
        }
    }

    /// Scripted flow: records the password each iteration received and fails
    /// the usernames it was told to fail.
    struct MockFlow {
        seen: Mutex<Vec<(String, String)>>,
        failing_usernames: Vec<String>,
    }

    impl MockFlow {
        fn passing() -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                failing_usernames: Vec::new(),
            }
        }

        fn failing(usernames: &[&str]) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                failing_usernames: usernames.iter().map(|s| s.to_string()).collect(),
            }
        }

        fn seen(&self) -> Vec<(String, String)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl FlowScript for MockFlow {
        async fn execute(
            &self,
            _driver: &dyn SessionDriver,
            credential: &Credential,
            current_password: &str,
            _new_password: &str,
        ) -> RunOutcome {
            self.seen
                .lock()
                .unwrap()
                .push((credential.username.clone(), current_password.to_string()));

            let status = if self.failing_usernames.contains(&credential.username) {
                FlowStatus::StepFailed {
                    step: Step::VerifyLogin,
                    reason: "scripted failure".to_string(),
                }
            } else {
                FlowStatus::Passed
            };

            RunOutcome {
                username: credential.username.clone(),
                status,
                started_at: Utc::now(),
                duration_ms: 0,
            }
        }
    }

    fn credentials(names: &[&str]) -> Vec<Credential> {
        names.iter().map(|n| Credential::new(*n)).collect()
    }

    #[tokio::test]
    async fn one_outcome_per_credential_in_input_order() {
        let runner = Runner::new(MockFlow::passing(), FailurePolicy::ContinueOnFailure);
        let creds = credentials(&["a@x.com", "b@x.com", "c@x.com"]);

        let summary = runner.run(&NoopDriver, &creds, "P0", "P1").await;

        let usernames: Vec<_> = summary
            .outcomes
            .iter()
            .map(|o| o.username.as_str())
            .collect();
        assert_eq!(usernames, vec!["a@x.com", "b@x.com", "c@x.com"]);
        assert!(summary.all_passed());
    }

    #[tokio::test]
    async fn committed_password_threads_into_next_iteration() {
        let flow = MockFlow::passing();
        let runner = Runner::new(flow, FailurePolicy::ContinueOnFailure);
        let creds = credentials(&["a@x.com", "b@x.com"]);

        let summary = runner.run(&NoopDriver, &creds, "P0", "P1").await;
        assert!(summary.all_passed());

        let seen = runner.flow.seen();
        assert_eq!(seen[0], ("a@x.com".to_string(), "P0".to_string()));
        assert_eq!(seen[1], ("b@x.com".to_string(), "P1".to_string()));
    }

    #[tokio::test]
    async fn failed_iteration_does_not_commit_the_new_password() {
        let flow = MockFlow::failing(&["a@x.com"]);
        let runner = Runner::new(flow, FailurePolicy::ContinueOnFailure);
        let creds = credentials(&["a@x.com", "b@x.com"]);

        let summary = runner.run(&NoopDriver, &creds, "P0", "P1").await;
        assert_eq!(summary.failed_count(), 1);

        // b@x.com still runs against the initial password.
        let seen = runner.flow.seen();
        assert_eq!(seen[1], ("b@x.com".to_string(), "P0".to_string()));
    }

    #[tokio::test]
    async fn continue_policy_attempts_every_credential() {
        let flow = MockFlow::failing(&["a@x.com", "b@x.com"]);
        let runner = Runner::new(flow, FailurePolicy::ContinueOnFailure);
        let creds = credentials(&["a@x.com", "b@x.com", "c@x.com"]);

        let summary = runner.run(&NoopDriver, &creds, "P0", "P1").await;
        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(summary.failed_count(), 2);
        assert_eq!(summary.passed_count(), 1);
    }

    #[tokio::test]
    async fn abort_policy_stops_after_first_failure() {
        let flow = MockFlow::failing(&["b@x.com"]);
        let runner = Runner::new(flow, FailurePolicy::AbortOnFailure);
        let creds = credentials(&["a@x.com", "b@x.com", "c@x.com"]);

        let summary = runner.run(&NoopDriver, &creds, "P0", "P1").await;
        assert_eq!(summary.outcomes.len(), 2);
        assert!(!summary.all_passed());

        let seen = runner.flow.seen();
        assert_eq!(seen.len(), 2);
    }
}
