use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dagctl")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Validate, deploy and destroy typed resource graphs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: ~/.config/dagctl/config.toml)
    #[arg(long, global = true, env = "DAGCTL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a graph and show the deployment order
    Plan(GraphArgs),

    /// Deploy every node, then wire every edge
    Deploy(GraphArgs),

    /// Tear down every node in reverse declaration order
    Destroy(DestroyArgs),

    /// List registered node kinds with their ports
    Kinds(KindsArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct GraphArgs {
    /// Graph document (.yaml, .yml, .json or .toml)
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct KindsArgs {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}
