use super::state::{AttemptResult, SweepDecision};

/// Map an outcome to a decision. Pure: depends only on the outcome and the
/// stop-on-first-success flag.
pub fn decide(result: &AttemptResult, stop_on_success: bool) -> SweepDecision {
    match result {
        AttemptResult::Success if stop_on_success => SweepDecision::StopSweep,
        AttemptResult::Success => SweepDecision::Continue,
        // A forced reset confirms the password; the sweep always ends here.
        AttemptResult::MustResetPassword => SweepDecision::StopSweep,
        AttemptResult::InvalidCredentials
        | AttemptResult::AccountDisabled
        | AttemptResult::PasswordExpired => SweepDecision::Continue,
        AttemptResult::AccountLocked
        | AttemptResult::Unknown(_)
        | AttemptResult::TransportError(_) => SweepDecision::Escalate,
    }
}
