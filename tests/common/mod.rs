use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use bindsweep::config::{Credential, Endpoint, SweepConfig};
use bindsweep::directory::{BindMechanism, DirectoryBinder, RawBindOutcome, SessionHandle};
use bindsweep::errors::SweepError;
use bindsweep::sweep::{DecisionProvider, Escalation, GateDecision};

pub fn ad_message(sub_code: &str) -> String {
    format!(
        "80090308: LdapErr: DSID-0C09044E, comment: AcceptSecurityContext error, data {}, v4563",
        sub_code
    )
}

pub fn rejected(sub_code: &str) -> RawBindOutcome {
    RawBindOutcome::Rejected { code: 49, message: ad_message(sub_code) }
}

pub fn config(users: &[&str], passwords: &[&str]) -> SweepConfig {
    let mut config = SweepConfig::new(Endpoint::new("dc01.corp.local", false), Some("CORP".into()));
    config.usernames = users.iter().map(|u| u.to_string()).collect();
    config.credentials = passwords
        .iter()
        .map(|p| Credential::Password(p.to_string()))
        .collect();
    config.delay = Duration::ZERO;
    config
}

#[derive(Debug, Clone)]
pub struct Call {
    pub identity: String,
    pub credential: String,
    pub url: String,
    pub at: Instant,
}

enum Scripted {
    Outcome(RawBindOutcome),
    Fail(String),
}

/// In-memory directory: answers per (username, password), `data 52e` otherwise.
#[derive(Clone, Default)]
pub struct ScriptedBinder {
    answers: Arc<Mutex<HashMap<(String, String), Scripted>>>,
    calls: Arc<Mutex<Vec<Call>>>,
    cancel_on_call: Option<(usize, CancellationToken)>,
    reject_hash: bool,
}

impl ScriptedBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(self, user: &str, password: &str, outcome: RawBindOutcome) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert((user.into(), password.into()), Scripted::Outcome(outcome));
        self
    }

    pub fn fail(self, user: &str, password: &str, error: &str) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert((user.into(), password.into()), Scripted::Fail(error.into()));
        self
    }

    /// Cancel `token` while serving the `n`th bind (1-based).
    pub fn cancel_during(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_on_call = Some((n, token));
        self
    }

    pub fn without_hash_support(mut self) -> Self {
        self.reject_hash = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `(username, password)` for every bind, in order.
    pub fn attempted(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .map(|c| {
                let user = c.identity.rsplit('\\').next().unwrap_or_default().to_string();
                (user, c.credential)
            })
            .collect()
    }
}

#[async_trait]
impl DirectoryBinder for ScriptedBinder {
    async fn bind(
        &self,
        session: &SessionHandle,
        identity: &str,
        credential: &Credential,
    ) -> Result<RawBindOutcome, SweepError> {
        let secret = credential.revealed();
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(Call {
                identity: identity.to_string(),
                credential: secret.clone(),
                url: session.url(),
                at: Instant::now(),
            });
            calls.len()
        };
        if let Some((n, token)) = &self.cancel_on_call {
            if *n == count {
                token.cancel();
            }
        }

        let user = identity.rsplit('\\').next().unwrap_or_default().to_string();
        match self.answers.lock().unwrap().get(&(user, secret)) {
            Some(Scripted::Outcome(outcome)) => Ok(outcome.clone()),
            Some(Scripted::Fail(msg)) => Err(SweepError::Transport(msg.clone())),
            None => Ok(rejected("52e")),
        }
    }

    fn supports(&self, mechanism: BindMechanism) -> bool {
        !(self.reject_hash && mechanism == BindMechanism::NtlmHash)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Replays a fixed list of answers and counts how often it was asked.
#[derive(Clone)]
pub struct ScriptedDecisions {
    answers: Arc<Mutex<VecDeque<GateDecision>>>,
    asked: Arc<Mutex<Vec<Escalation>>>,
}

impl ScriptedDecisions {
    pub fn new(answers: &[GateDecision]) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.iter().copied().collect())),
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn asked(&self) -> Vec<Escalation> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionProvider for ScriptedDecisions {
    async fn decide(&mut self, escalation: &Escalation) -> Result<GateDecision, SweepError> {
        self.asked.lock().unwrap().push(escalation.clone());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SweepError::Prompt("script exhausted".into()))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
