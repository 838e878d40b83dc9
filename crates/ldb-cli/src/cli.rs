use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ldb",
    about = "LDB: key-value storage on an integer scoreboard",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the end-to-end self test against an in-memory scoreboard
    Selftest(SelftestArgs),
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args)]
pub struct SelftestArgs {
    /// Database the steps run against
    #[arg(long, default_value = "testDataBase")]
    pub db: String,
}
