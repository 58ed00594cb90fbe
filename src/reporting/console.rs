use console::style;

use crate::directory::probe::ServiceMetadata;
use crate::sweep::classifier::extract_sub_code;
use crate::sweep::state::{AttemptEvent, AttemptResult, SweepState, SweepSummary};
use crate::utils::formatting::format_duration;
use super::reporter::ResultReporter;

pub fn render_success(msg: &str) -> String {
    format!("{} {}", style("[+]").green().bold(), msg)
}

pub fn render_status(msg: &str) -> String {
    format!("{} {}", style("[*]").blue().bold(), msg)
}

pub fn render_failure(msg: &str) -> String {
    format!("{} {}", style("[-]").red().bold(), msg)
}

pub fn render_warning(msg: &str) -> String {
    format!("{} {}", style("[!]").yellow().bold(), msg)
}

/// Render one attempt as one or two styled lines.
pub fn render_event(event: &AttemptEvent) -> String {
    let user = &event.username;
    let detail = event.raw_message.as_deref().map(|raw| match extract_sub_code(raw) {
        Some(code) => format!("[{}] {}", code, raw),
        None => raw.to_string(),
    });
    let with_detail = |line: String| match &detail {
        Some(d) => format!("{}\n    {}", line, style(d).dim()),
        None => line,
    };

    match &event.result {
        AttemptResult::Success => render_success(&format!(
            "VALID - {} : {}",
            style(user).green().bold(),
            event.credential.revealed()
        )),
        AttemptResult::MustResetPassword => with_detail(render_success(&format!(
            "VALID - But user must reset password : {} : {}",
            style(user).green().bold(),
            event.credential.revealed()
        ))),
        AttemptResult::InvalidCredentials => with_detail(render_status(&format!(
            "Invalid credentials for user : {} ({})",
            user,
            event.credential.masked()
        ))),
        AttemptResult::AccountDisabled => {
            with_detail(render_warning(&format!("User is disabled : {}", user)))
        }
        AttemptResult::PasswordExpired => {
            with_detail(render_warning(&format!("User password has expired : {}", user)))
        }
        AttemptResult::AccountLocked => with_detail(render_failure(&format!(
            "WARNING - Account is locked : {}",
            style(user).red().bold()
        ))),
        AttemptResult::Unknown(desc) => {
            render_warning(&format!("Unknown error for {} - {}", user, desc))
        }
        AttemptResult::TransportError(desc) => {
            render_warning(&format!("Transport error for {} - {}", user, desc))
        }
    }
}

pub fn render_summary(summary: &SweepSummary) -> String {
    let state = match summary.state {
        SweepState::Completed => style(summary.state.to_string()).green().bold(),
        SweepState::Halted(_) => style(summary.state.to_string()).yellow().bold(),
        SweepState::Running => style(summary.state.to_string()).dim(),
    };
    let mut out = format!(
        "\n{} {} | started {} | {}/{} attempts | {} valid | {}\n",
        style("Sweep").white().bold(),
        state,
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        summary.attempts,
        summary.planned,
        summary.valid.len(),
        format_duration(summary.elapsed_ms),
    );
    for valid in &summary.valid {
        let note = if valid.must_reset { " (must reset)" } else { "" };
        out.push_str(&format!(
            "  {} {} : {}{}\n",
            style("✓").green(),
            style(&valid.username).green(),
            valid.credential.revealed(),
            style(note).dim(),
        ));
    }
    out
}

pub fn render_metadata(meta: &ServiceMetadata) -> String {
    let mut out = render_success(&format!("Anonymous RootDSE bind success ({})", meta.url));
    out.push('\n');
    for (name, values) in &meta.attributes {
        out.push_str(&format!("  {}:\n", style(name).cyan()));
        for value in values {
            out.push_str(&format!("    {}\n", value));
        }
    }
    out
}

/// Render the version info.
pub fn render_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let build_ts = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");

    format!(
        "{} {} {}",
        style("bindsweep").white().bold(),
        style(version).white(),
        style(format!("({} {})", git_hash, build_ts)).dim(),
    )
}

/// Writes each event to stdout as it arrives.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ResultReporter for ConsoleReporter {
    fn report(&mut self, event: &AttemptEvent) {
        // Quiet mode only hides the expected negatives
        if self.quiet && matches!(event.result, AttemptResult::InvalidCredentials) {
            return;
        }
        println!("{}", render_event(event));
    }

    fn finished(&mut self, summary: &SweepSummary) {
        println!("{}", render_summary(summary));
    }
}
