mod cmd;
mod context;
mod output;

use clap::{Parser, Subcommand};
use stackset_core::types::{CallAs, InstanceStatusFilter, RetryKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "stackset-dashboard",
    about = "CloudFormation StackSet health dashboard and remediation tool",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (default: built-in defaults)
    #[arg(long, global = true, env = "STACKSET_DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// AWS region for API calls and new stack instances
    #[arg(long, global = true, env = "AWS_DEFAULT_REGION")]
    region: Option<String>,

    /// Identity StackSet calls are made as (DELEGATED_ADMIN or SELF)
    #[arg(long, global = true)]
    call_as: Option<CallAs>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web dashboard
    Serve {
        /// Address to bind (default from config: 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (0 = OS-assigned; default from config: 1980)
        #[arg(long)]
        port: Option<u16>,

        /// Open the dashboard in a browser once listening
        #[arg(long)]
        open: bool,
    },

    /// Print deployment health for every active stack set
    Report,

    /// List organization accounts sorted by name
    Accounts,

    /// List instances of a stack set in one status bucket
    Instances {
        stack_set: String,

        /// in-sync, drifted, succeeded, failed or skipped-suspended-account
        #[arg(long)]
        status: InstanceStatusFilter,

        /// Account id to leave out (repeatable)
        #[arg(long = "ignore")]
        ignore: Vec<String>,
    },

    /// Deploy a stack set to organization accounts that lack an instance
    AddUndeployed {
        stack_set: String,

        /// Show what would be added without calling CloudFormation
        #[arg(long)]
        dry_run: bool,

        /// Account id to leave out (repeatable)
        #[arg(long = "ignore")]
        ignore: Vec<String>,
    },

    /// Remove instances skipped because their account is suspended or closed
    RemoveSuspended {
        stack_set: String,

        /// Show what would be removed without calling CloudFormation
        #[arg(long)]
        dry_run: bool,

        /// Account id to leave out (repeatable)
        #[arg(long = "ignore")]
        ignore: Vec<String>,
    },

    /// Re-run failed or drifted stack instances
    Retry {
        stack_set: String,

        /// failed or drifted
        #[arg(long)]
        kind: RetryKind,

        /// Show what would be retried without calling CloudFormation
        #[arg(long)]
        dry_run: bool,

        /// Account id to leave out (repeatable)
        #[arg(long = "ignore")]
        ignore: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let overrides = context::Overrides {
        region: cli.region,
        call_as: cli.call_as,
    };

    let result = context::load_config(cli.config.as_deref(), overrides).and_then(|config| {
        match cli.command {
            Commands::Serve { host, port, open } => cmd::serve::run(config, host, port, open),
            Commands::Report => cmd::report::run(&config, cli.json),
            Commands::Accounts => cmd::accounts::run(&config, cli.json),
            Commands::Instances {
                stack_set,
                status,
                ignore,
            } => cmd::instances::run(&config, &stack_set, status, ignore, cli.json),
            Commands::AddUndeployed {
                stack_set,
                dry_run,
                ignore,
            } => cmd::actions::add_undeployed(&config, &stack_set, dry_run, ignore, cli.json),
            Commands::RemoveSuspended {
                stack_set,
                dry_run,
                ignore,
            } => cmd::actions::remove_suspended(&config, &stack_set, dry_run, ignore, cli.json),
            Commands::Retry {
                stack_set,
                kind,
                dry_run,
                ignore,
            } => cmd::actions::retry(&config, &stack_set, kind, dry_run, ignore, cli.json),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
