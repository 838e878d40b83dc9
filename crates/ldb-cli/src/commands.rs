use colored::Colorize;
use ldb_sdk::{Ldb, LdbConfig, ObjectiveId};

use crate::cli::*;
use crate::selftest::SelfTest;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => LdbConfig::load(path)?,
        None => LdbConfig::default(),
    };
    match cli.command {
        Command::Selftest(args) => cmd_selftest(args, config),
        Command::Config => cmd_config(&config),
    }
}

fn cmd_selftest(args: SelftestArgs, config: LdbConfig) -> anyhow::Result<()> {
    let db = ObjectiveId::new(args.db)?;
    tracing::info!(db = %db, slot = %config.display_slot, "running self test");
    let ldb = Ldb::in_memory(config)?;
    let summary = SelfTest::new(&ldb, db).run();

    println!();
    if summary.failed == 0 {
        println!("{} {} steps passed", "✓".green().bold(), summary.passed);
        Ok(())
    } else {
        println!(
            "{} {} passed, {} failed",
            "✗".red().bold(),
            summary.passed,
            summary.failed.to_string().red()
        );
        anyhow::bail!("self test failed: {}", summary.failed_steps.join(", "))
    }
}

fn cmd_config(config: &LdbConfig) -> anyhow::Result<()> {
    print!("{}", config.to_toml_string()?);
    Ok(())
}
