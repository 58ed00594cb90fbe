use async_trait::async_trait;
use console::{style, Term};
use tokio_util::sync::CancellationToken;

use crate::errors::SweepError;
use crate::sweep::gate::{DecisionProvider, Escalation};
use crate::sweep::state::GateDecision;

/// Accepted answers: `y`/`yes` continue, `n`/`no` abort.
pub fn parse_answer(input: &str) -> Option<GateDecision> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(GateDecision::Continue),
        "n" | "no" => Some(GateDecision::Abort),
        _ => None,
    }
}

/// Ask until a valid answer arrives. Invalid input only re-prompts.
pub fn ask_until_valid<R, W>(question: &str, mut read_line: R, mut write: W) -> Result<GateDecision, SweepError>
where
    R: FnMut() -> std::io::Result<String>,
    W: FnMut(&str),
{
    loop {
        write(&format!("{} {} [y/n]: ", style("[?]").yellow().bold(), question));
        let line = read_line().map_err(|e| SweepError::Prompt(e.to_string()))?;
        match parse_answer(&line) {
            Some(decision) => return Ok(decision),
            None => write("Enter y or n\n"),
        }
    }
}

/// Terminal used for the operator prompt. Stdout may be piped.
fn prompt_term() -> Term {
    Term::stderr()
}

/// Interactive operator prompt on the controlling terminal.
pub struct ConsolePrompt {
    cancel_token: CancellationToken,
}

impl ConsolePrompt {
    pub fn new(cancel_token: CancellationToken) -> Self {
        Self { cancel_token }
    }
}

#[async_trait]
impl DecisionProvider for ConsolePrompt {
    async fn decide(&mut self, escalation: &Escalation) -> Result<GateDecision, SweepError> {
        let term = prompt_term();
        if !term.is_term() {
            return Err(SweepError::Prompt(
                "stderr is not a terminal; use --non-interactive".into(),
            ));
        }

        let question = escalation.question();
        let ask = tokio::task::spawn_blocking(move || {
            ask_until_valid(
                &question,
                || term.read_line(),
                |text| {
                    let _ = prompt_term().write_str(text);
                },
            )
        });

        tokio::select! {
            _ = self.cancel_token.cancelled() => {
                Err(SweepError::Prompt("interrupted while waiting for an answer".into()))
            }
            joined = ask => {
                joined.map_err(|e| SweepError::Internal(format!("prompt task failed: {}", e)))?
            }
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
