use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::metrics::GroupBy;

#[derive(Parser)]
#[command(name = "caplan")]
#[command(about = "A capacity-planning dashboard for issue-tracker data", version)]
#[command(after_help = "EXAMPLES:
    caplan source connect PROJ        Import a project from the tracker
    caplan dashboard                  Sprint health and team utilization
    caplan forecast                   Workload vs capacity per sprint
    caplan profit --by epic           Profitability quadrants by epic
    caplan team capacity u123 18      Adjust a member's sprint capacity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show error cause chain on failure
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage connected data sources
    #[command(after_help = "EXAMPLES:
    caplan source connect PROJ --board 12
    caplan source paste --tag acme --file export.json
    caplan source list
    caplan source remove acme")]
    Source {
        #[command(subcommand)]
        action: SourceCommands,
    },
    /// List issues in the working set
    #[command(after_help = "EXAMPLES:
    caplan issues
    caplan issues --source acme --status done")]
    Issues(IssueListArgs),
    /// Team members and capacity
    #[command(after_help = "EXAMPLES:
    caplan team list
    caplan team capacity u123 18")]
    Team {
        #[command(subcommand)]
        action: TeamCommands,
    },
    /// Sprint health and per-member utilization
    #[command(after_help = "EXAMPLES:
    caplan dashboard
    caplan dashboard --json")]
    Dashboard,
    /// Workload vs capacity for every sprint
    #[command(after_help = "EXAMPLES:
    caplan forecast")]
    Forecast,
    /// Time-tracking accuracy and budget overruns
    #[command(after_help = "EXAMPLES:
    caplan timetrack")]
    Timetrack,
    /// Profitability quadrants per client group
    #[command(after_help = "EXAMPLES:
    caplan profit
    caplan profit --by epic --revenue PROJ=50000")]
    Profit(ProfitArgs),
    /// Send the snapshot for AI analysis
    #[command(after_help = "EXAMPLES:
    caplan analyze")]
    Analyze,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    caplan completions bash > ~/.bash_completion.d/caplan
    caplan completions zsh > ~/.zfunc/_caplan")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    caplan init")]
    Init,
}

#[derive(Subcommand)]
pub enum SourceCommands {
    /// List connected sources
    List,
    /// Import a project from the configured tracker
    Connect(ConnectArgs),
    /// Import a pasted JSON export
    Paste(PasteArgs),
    /// Remove a source and everything it contributed
    Remove {
        /// Source tag to remove
        tag: String,
    },
}

#[derive(Args)]
pub struct ConnectArgs {
    /// Project key (uses default_project if not specified)
    pub project: Option<String>,

    /// Agile board id for sprint data (uses config if not specified)
    #[arg(long)]
    pub board: Option<u64>,

    /// Source tag for the import (defaults to the project key)
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Args)]
pub struct PasteArgs {
    /// Source tag for the import
    #[arg(long)]
    pub tag: String,

    /// Path to the export file (stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct IssueListArgs {
    /// Filter by source tag
    #[arg(long)]
    pub source: Option<String>,

    /// Filter by assignee id
    #[arg(long)]
    pub assignee: Option<String>,

    /// Filter by status name
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Subcommand)]
pub enum TeamCommands {
    /// List members with capacity and utilization
    List,
    /// Set a member's per-sprint capacity
    Capacity {
        /// Member id
        id: String,
        /// New capacity in story points per sprint
        capacity: f64,
    },
}

#[derive(Args)]
pub struct ProfitArgs {
    /// Grouping mode
    #[arg(long, value_enum, default_value = "project")]
    pub by: GroupBy,

    /// Revenue override as KEY=AMOUNT (repeatable, wins over config)
    #[arg(long = "revenue", value_name = "KEY=AMOUNT")]
    pub revenue: Vec<String>,
}
