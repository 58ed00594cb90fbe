use std::path::PathBuf;
use std::time::Duration;

use bindsweep::config::{self, Endpoint};
use bindsweep::directory::probe;
use bindsweep::errors::SweepError;
use bindsweep::reporting::console::{render_failure, render_metadata};

use super::commands::ProbeArgs;

/// Returns the process exit code; a failed probe is reported, not retried.
pub async fn handle_probe(args: ProbeArgs) -> Result<i32, SweepError> {
    let file_config = match &args.config {
        Some(path) => Some(config::parse_config(&PathBuf::from(path)).await?),
        None => None,
    };
    let file = file_config.as_ref();

    let server = args
        .server
        .clone()
        .or_else(|| file.and_then(|f| f.server.clone()))
        .ok_or_else(|| SweepError::Config("LDAP server is required (-s)".into()))?;
    let mut endpoint = Endpoint::new(server, args.ssl || file.and_then(|f| f.ssl).unwrap_or(false));
    if let Some(secs) = args.timeout.or_else(|| file.and_then(|f| f.timeout_secs)) {
        endpoint.timeout = Duration::from_secs(secs);
    }
    endpoint.verify_tls = args.verify_tls || file.and_then(|f| f.verify_tls).unwrap_or(false);
    endpoint.validate()?;

    match probe(&endpoint).await {
        Ok(meta) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&meta)?);
            } else {
                print!("{}", render_metadata(&meta));
            }
            Ok(0)
        }
        Err(e) => {
            println!("{}", render_failure(&format!("Anonymous RootDSE bind failed: {}", e)));
            Ok(1)
        }
    }
}
