use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bindsweep", version, about = "Rate-limited LDAP credential validation sweep")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Hide invalid-credential lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Try every username against every credential
    Sweep(SweepArgs),
    /// Anonymous RootDSE bind to read server metadata
    Probe(ProbeArgs),
}

#[derive(Args, Clone, Default)]
pub struct SweepArgs {
    /// LDAP server host name or address
    #[arg(short, long)]
    pub server: Option<String>,

    /// Use LDAPS (port 636)
    #[arg(long)]
    pub ssl: bool,

    /// Active Directory domain (NetBIOS name)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Single username (repeatable)
    #[arg(short = 'u', long = "user", conflicts_with = "user_file")]
    pub users: Vec<String>,

    /// File with one username per line
    #[arg(short = 'U', long)]
    pub user_file: Option<String>,

    /// Single password (repeatable)
    #[arg(short = 'p', long = "password", conflicts_with_all = ["password_file", "hash"])]
    pub passwords: Vec<String>,

    /// File with one password per line
    #[arg(short = 'P', long, conflicts_with = "hash")]
    pub password_file: Option<String>,

    /// NT hash (or LM:NT) for pass-the-hash authentication
    #[arg(short = 'H', long)]
    pub hash: Option<String>,

    /// Do not stop when a valid account is found
    #[arg(long)]
    pub no_stop: bool,

    /// Minimum delay between attempts in milliseconds [default: 200]
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Extra random delay of up to this many milliseconds
    #[arg(long)]
    pub jitter_ms: Option<u64>,

    /// Connection and bind timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Verify the server certificate when using --ssl
    #[arg(long)]
    pub verify_tls: bool,

    /// Never prompt; answer escalations with --default-decision
    #[arg(long)]
    pub non_interactive: bool,

    /// Escalation answer in non-interactive mode: continue, abort [default: abort]
    #[arg(long)]
    pub default_decision: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct ProbeArgs {
    /// LDAP server host name or address
    #[arg(short, long)]
    pub server: Option<String>,

    /// Use LDAPS (port 636)
    #[arg(long)]
    pub ssl: bool,

    /// Connection timeout in seconds [default: 10]
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Verify the server certificate when using --ssl
    #[arg(long)]
    pub verify_tls: bool,

    /// Print the RootDSE as JSON
    #[arg(long)]
    pub json: bool,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_sweep_flags() {
        let cli = Cli::try_parse_from([
            "bindsweep", "sweep", "-s", "dc01", "-d", "CORP", "-u", "alice", "-u", "bob",
            "-p", "pw1", "-p", "pw2", "--no-stop",
        ])
        .unwrap();
        match cli.command {
            Commands::Sweep(args) => {
                assert_eq!(args.users, vec!["alice", "bob"]);
                assert_eq!(args.passwords, vec!["pw1", "pw2"]);
                assert!(args.no_stop);
                assert!(!args.ssl);
            }
            _ => panic!("expected sweep"),
        }
    }

    #[test]
    fn test_user_sources_conflict() {
        let parsed = Cli::try_parse_from([
            "bindsweep", "sweep", "-u", "alice", "-U", "users.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_hash_conflicts_with_passwords() {
        let parsed = Cli::try_parse_from([
            "bindsweep", "sweep", "-p", "pw", "-H", "31d6cfe0d16ae931b73c59d7e0c089c0",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bindsweep", "probe", "-s", "dc01", "-vv", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Probe(ref a) if a.json));
    }
}
