mod cli;

use bindsweep::errors::SweepError;
use bindsweep::reporting::console::{render_version, render_warning};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = cli::Cli::parse();

    // Console output carries the results; logs stay quiet unless asked for
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.with_ansi(!cli.no_color).init();
    }

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n{}", render_warning("Key event detected, closing..."));
            ctrl_c_token.cancel();
        }
    });

    if !cli.quiet {
        eprintln!("{}", render_version());
    }

    let result: Result<i32, SweepError> = match cli.command {
        cli::Commands::Sweep(args) => {
            cli::sweep::handle_sweep(args, cli.quiet, cancel_token)
                .await
                .map(|state| state.exit_code())
        }
        cli::Commands::Probe(args) => cli::probe::handle_probe(args).await,
    };

    // Exit explicitly: a pending operator prompt must not hold the runtime open
    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}
