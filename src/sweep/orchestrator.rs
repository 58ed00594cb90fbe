use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::config::SweepConfig;
use crate::directory::binder::{BindMechanism, DirectoryBinder, RawBindOutcome};
use crate::directory::session::SessionFactory;
use crate::errors::SweepError;
use crate::reporting::ResultReporter;
use super::classifier::ResponseClassifier;
use super::gate::{Escalation, EscalationGate};
use super::policy;
use super::state::*;
use super::throttle::Throttle;

/// What the loop does after an attempt has been reported.
enum Step {
    Next,
    SkipIdentity,
    Halt(HaltReason),
}

/// Runs the username-major credential sweep.
pub struct SweepOrchestrator {
    sweep_id: String,
    config: Arc<SweepConfig>,
    factory: SessionFactory,
    binder: Arc<dyn DirectoryBinder>,
    classifier: ResponseClassifier,
    throttle: Throttle,
    gate: EscalationGate,
    reporter: Box<dyn ResultReporter>,
    cancel_token: CancellationToken,
    state: SweepState,
    attempts: usize,
    valid: Vec<ValidCredential>,
    locked: HashSet<String>,
}

impl SweepOrchestrator {
    /// Validates the configuration and checks the binder can handle every
    /// credential before any network activity.
    pub fn new(
        config: SweepConfig,
        binder: Arc<dyn DirectoryBinder>,
        gate: EscalationGate,
        reporter: Box<dyn ResultReporter>,
    ) -> Result<Self, SweepError> {
        config.validate()?;

        for credential in &config.credentials {
            let mechanism = BindMechanism::for_credential(credential);
            if !binder.supports(mechanism) {
                return Err(SweepError::Config(format!(
                    "The {} binder does not support {:?} authentication",
                    binder.name(),
                    mechanism
                )));
            }
        }

        let factory = SessionFactory::new(config.endpoint.clone());
        let classifier = ResponseClassifier::with_rules(&config.classification);
        let throttle = Throttle::new(config.delay).with_jitter(config.jitter);

        Ok(Self {
            sweep_id: uuid::Uuid::new_v4().to_string(),
            config: Arc::new(config),
            factory,
            binder,
            classifier,
            throttle,
            gate,
            reporter,
            cancel_token: CancellationToken::new(),
            state: SweepState::Running,
            attempts: 0,
            valid: Vec::new(),
            locked: HashSet::new(),
        })
    }

    /// Replace the internal cancel token with an external one (e.g. wired to Ctrl-C).
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn sweep_id(&self) -> &str {
        &self.sweep_id
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Run until every pair is tried or a halting outcome occurs.
    pub async fn run(mut self) -> SweepSummary {
        let span = info_span!("sweep", sweep_id = %self.sweep_id);
        let started_at = Utc::now();
        let started = Instant::now();

        self.run_pairs().instrument(span).await;

        let summary = SweepSummary {
            sweep_id: self.sweep_id.clone(),
            started_at,
            state: self.state,
            attempts: self.attempts,
            planned: self.config.pair_count(),
            valid: std::mem::take(&mut self.valid),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            sweep_id = %summary.sweep_id,
            state = %summary.state,
            attempts = summary.attempts,
            valid = summary.valid.len(),
            "Sweep finished"
        );
        self.reporter.finished(&summary);
        summary
    }

    async fn run_pairs(&mut self) {
        let config = Arc::clone(&self.config);
        info!(
            users = config.usernames.len(),
            credentials = config.credentials.len(),
            server = %config.endpoint.server,
            "Starting sweep"
        );

        'users: for username in &config.usernames {
            if self.locked.contains(username) {
                debug!(user = %username, "Skipping locked account");
                continue;
            }
            for credential in &config.credentials {
                // Cancellation wins over the throttle so no bind starts after an interrupt
                let interrupted = tokio::select! {
                    biased;
                    _ = self.cancel_token.cancelled() => true,
                    _ = self.throttle.wait() => false,
                };
                if interrupted {
                    self.halt(HaltReason::Interrupted);
                    return;
                }

                let pair = CredentialPair { username, credential };
                match self.attempt(pair).await {
                    Step::Next => {}
                    Step::SkipIdentity => continue 'users,
                    Step::Halt(reason) => {
                        self.halt(reason);
                        return;
                    }
                }
            }
        }

        self.state = SweepState::Completed;
    }

    async fn attempt(&mut self, pair: CredentialPair<'_>) -> Step {
        self.attempts += 1;
        let index = self.attempts;

        let session = self.factory.build();
        let identity = pair.identity(self.config.domain());
        debug!(attempt = index, user = %pair.username, url = %session.url(), "Submitting bind");

        let raw = match self.binder.bind(&session, &identity, pair.credential).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(error_type = e.error_type(), error = %e, "Bind raised an error");
                RawBindOutcome::TransportFailure(e.to_string())
            }
        };

        let result = self.classifier.classify(&raw);
        let decision = policy::decide(&result, self.config.stop_on_success);
        info!(
            attempt = index,
            user = %pair.username,
            outcome = result.as_str(),
            decision = ?decision,
            "Attempt classified"
        );

        if result.is_valid_credential() {
            self.valid.push(ValidCredential {
                username: pair.username.to_string(),
                credential: pair.credential.clone(),
                must_reset: result == AttemptResult::MustResetPassword,
            });
        }

        self.reporter.report(&AttemptEvent {
            index,
            username: pair.username.to_string(),
            credential: pair.credential.clone(),
            result: result.clone(),
            decision,
            raw_message: raw_message(&raw),
        });

        match decision {
            SweepDecision::Continue => Step::Next,
            SweepDecision::StopSweep => match result {
                AttemptResult::MustResetPassword => Step::Halt(HaltReason::MustResetPassword),
                _ => Step::Halt(HaltReason::Success),
            },
            SweepDecision::Escalate => self.escalate(pair, result).await,
        }
    }

    async fn escalate(&mut self, pair: CredentialPair<'_>, result: AttemptResult) -> Step {
        let locked = result == AttemptResult::AccountLocked;
        let escalation = Escalation {
            username: pair.username.to_string(),
            result,
        };

        let answer = self.gate.decide(&escalation).await;
        if self.cancel_token.is_cancelled() {
            return Step::Halt(HaltReason::Interrupted);
        }

        match (answer, locked) {
            (GateDecision::Abort, true) => Step::Halt(HaltReason::AccountLocked),
            (GateDecision::Abort, false) => Step::Halt(HaltReason::OperatorAbort),
            // A locked account yields nothing further; move to the next user.
            (GateDecision::Continue, true) => {
                self.locked.insert(pair.username.to_string());
                warn!(user = %pair.username, "Account locked, skipping remaining credentials");
                Step::SkipIdentity
            }
            (GateDecision::Continue, false) => Step::Next,
        }
    }

    fn halt(&mut self, reason: HaltReason) {
        if !self.state.is_terminal() {
            self.state = SweepState::Halted(reason);
        }
    }
}

fn raw_message(raw: &RawBindOutcome) -> Option<String> {
    match raw {
        RawBindOutcome::Rejected { message, .. } if !message.trim().is_empty() => {
            Some(message.trim().to_string())
        }
        _ => None,
    }
}
