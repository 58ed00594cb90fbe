use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::SweepError;
use super::state::{AttemptResult, GateDecision};

/// What the operator is asked about.
#[derive(Debug, Clone)]
pub struct Escalation {
    pub username: String,
    pub result: AttemptResult,
}

impl Escalation {
    pub fn question(&self) -> String {
        match &self.result {
            AttemptResult::AccountLocked => format!(
                "Account '{}' is locked. Continue with the next user?",
                self.username
            ),
            other => format!("{} for '{}'. Do you want to continue?", other, self.username),
        }
    }
}

/// Source of operator decisions.
#[async_trait]
pub trait DecisionProvider: Send {
    async fn decide(&mut self, escalation: &Escalation) -> Result<GateDecision, SweepError>;

    /// Interactive providers block on the operator.
    fn is_interactive(&self) -> bool {
        false
    }
}

/// Answers every escalation with the configured default, without prompting.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub GateDecision);

#[async_trait]
impl DecisionProvider for FixedDecision {
    async fn decide(&mut self, _escalation: &Escalation) -> Result<GateDecision, SweepError> {
        Ok(self.0)
    }
}

/// Suspends the sweep on outcomes that need operator judgment.
pub struct EscalationGate {
    provider: Box<dyn DecisionProvider>,
}

impl EscalationGate {
    pub fn new(provider: Box<dyn DecisionProvider>) -> Self {
        Self { provider }
    }

    pub fn non_interactive(default: GateDecision) -> Self {
        Self::new(Box::new(FixedDecision(default)))
    }

    pub fn is_interactive(&self) -> bool {
        self.provider.is_interactive()
    }

    /// A provider failure (closed stdin, broken terminal) counts as abort.
    pub async fn decide(&mut self, escalation: &Escalation) -> GateDecision {
        match self.provider.decide(escalation).await {
            Ok(decision) => {
                info!(
                    user = %escalation.username,
                    outcome = escalation.result.as_str(),
                    decision = decision.as_str(),
                    "Escalation resolved"
                );
                decision
            }
            Err(e) => {
                warn!(error = %e, "Decision provider failed, aborting");
                GateDecision::Abort
            }
        }
    }
}
