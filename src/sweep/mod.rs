pub mod classifier;
pub mod gate;
pub mod orchestrator;
pub mod policy;
pub mod state;
pub mod throttle;

pub use classifier::{ClassificationRule, RejectionKind, ResponseClassifier};
pub use gate::{DecisionProvider, Escalation, EscalationGate, FixedDecision};
pub use orchestrator::SweepOrchestrator;
pub use state::*;
pub use throttle::Throttle;
