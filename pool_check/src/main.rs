use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use log::info;
use pool_check::{run_pools, AnalysisConfig, EtherscanClient, FailurePolicy};
use std::io;

async fn run() -> Result<bool> {
    let matches = Command::new("pool_check")
        .version("0.1.0")
        .about("Reports holder concentration of the configured token pools")
        .arg(
            Arg::new("keep-going")
                .long("keep-going")
                .action(ArgAction::SetTrue)
                .help("Report a failing pool and continue with the rest"),
        )
        .get_matches();

    let policy = if matches.get_flag("keep-going") {
        FailurePolicy::KeepGoing
    } else {
        FailurePolicy::Abort
    };

    let config = AnalysisConfig::from_env().context("Error loading configuration")?;
    info!(
        "analyzing {} pools over blocks {}..={}",
        config.pools.len(),
        config.start_block,
        config.end_block
    );

    let source = EtherscanClient::new(&config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let outcomes = run_pools(&source, &config.pools, policy, &mut out).await?;
    Ok(outcomes.iter().all(|outcome| outcome.result.is_ok()))
}

#[tokio::main]
async fn main() {
    pool_check::logging::init();

    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            println!("{:#}", e);
            std::process::exit(1);
        }
    }
}
