use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use bindsweep::config::{
    self, Credential, Endpoint, FileConfig, NtHash, SweepConfig, DEFAULT_DELAY_MS,
    DEFAULT_TIMEOUT_SECS,
};
use bindsweep::directory::LdapBinder;
use bindsweep::errors::SweepError;
use bindsweep::reporting::console::{render_status, render_warning};
use bindsweep::reporting::{ConsolePrompt, ConsoleReporter};
use bindsweep::sweep::{EscalationGate, GateDecision, SweepOrchestrator, SweepState};
use bindsweep::utils::formatting::{estimate_sweep_ms, format_duration};

use super::commands::SweepArgs;

pub async fn handle_sweep(
    args: SweepArgs,
    quiet: bool,
    cancel_token: CancellationToken,
) -> Result<SweepState, SweepError> {
    let file_config = match &args.config {
        Some(path) => Some(config::parse_config(&PathBuf::from(path)).await?),
        None => None,
    };

    let sweep_config = build_sweep_config(&args, file_config.as_ref()).await?;

    let gate = match sweep_config.non_interactive {
        Some(default) => EscalationGate::non_interactive(default),
        None => EscalationGate::new(Box::new(ConsolePrompt::new(cancel_token.clone()))),
    };
    if !gate.is_interactive() {
        info!("Non-interactive mode: escalations resolve to the default decision");
    }

    let pairs = sweep_config.pair_count();
    let delay_ms = sweep_config.delay.as_millis() as u64;
    let server = sweep_config.endpoint.server.clone();
    let stop_on_success = sweep_config.stop_on_success;

    let orchestrator = SweepOrchestrator::new(
        sweep_config,
        Arc::new(LdapBinder::new()),
        gate,
        Box::new(ConsoleReporter::new(quiet)),
    )?
    .with_cancel_token(cancel_token);

    println!(
        "{}",
        render_status(&format!(
            "Sweeping {} with {} attempt(s), at least {} ({})",
            server,
            pairs,
            format_duration(estimate_sweep_ms(pairs, delay_ms)),
            orchestrator.sweep_id(),
        ))
    );
    if !stop_on_success {
        println!("{}", render_warning("Continuing after valid credentials (--no-stop)"));
    }

    let summary = orchestrator.run().await;
    Ok(summary.state)
}

/// Merge CLI flags over the optional config file and load the identity lists.
pub async fn build_sweep_config(
    args: &SweepArgs,
    file: Option<&FileConfig>,
) -> Result<SweepConfig, SweepError> {
    let server = args
        .server
        .clone()
        .or_else(|| file.and_then(|f| f.server.clone()))
        .ok_or_else(|| SweepError::Config("LDAP server is required (-s)".into()))?;
    let ssl = args.ssl || file.and_then(|f| f.ssl).unwrap_or(false);
    let timeout = args
        .timeout
        .or_else(|| file.and_then(|f| f.timeout_secs))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let mut endpoint = Endpoint::new(server, ssl);
    endpoint.timeout = Duration::from_secs(timeout);
    endpoint.verify_tls = args.verify_tls || file.and_then(|f| f.verify_tls).unwrap_or(false);

    let domain = args.domain.clone().or_else(|| file.and_then(|f| f.domain.clone()));
    let mut sweep = SweepConfig::new(endpoint, domain);

    sweep.usernames = match &args.user_file {
        Some(path) => config::load_identity_list(&PathBuf::from(path)).await?,
        None => args.users.clone(),
    };

    sweep.credentials = if let Some(hash) = &args.hash {
        vec![Credential::NtHash(NtHash::parse(hash)?)]
    } else if let Some(path) = &args.password_file {
        config::load_identity_list(&PathBuf::from(path))
            .await?
            .into_iter()
            .map(Credential::Password)
            .collect()
    } else {
        args.passwords.iter().cloned().map(Credential::Password).collect()
    };

    sweep.stop_on_success = !args.no_stop && file.and_then(|f| f.stop_on_success).unwrap_or(true);

    let non_interactive = args.non_interactive || file.and_then(|f| f.non_interactive).unwrap_or(false);
    if non_interactive {
        let default = match &args.default_decision {
            Some(raw) => raw.parse::<GateDecision>()?,
            None => file.and_then(|f| f.default_decision).unwrap_or(GateDecision::Abort),
        };
        sweep.non_interactive = Some(default);
    } else if args.default_decision.is_some() {
        return Err(SweepError::Config(
            "--default-decision requires --non-interactive".into(),
        ));
    }

    sweep.delay = Duration::from_millis(
        args.delay_ms
            .or_else(|| file.and_then(|f| f.delay_ms))
            .unwrap_or(DEFAULT_DELAY_MS),
    );
    sweep.jitter = Duration::from_millis(
        args.jitter_ms.or_else(|| file.and_then(|f| f.jitter_ms)).unwrap_or(0),
    );
    if let Some(f) = file {
        sweep.classification = f.classification.clone();
    }

    sweep.validate()?;
    Ok(sweep)
}
