use abi::Distribution;
use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use log::debug;
use pool_check::config::{parse_block, parse_pool};
use pool_check::report::write_report;
use pool_check::{analyze_pool, AnalysisConfig, EtherscanClient};
use std::io::{self, Write};

fn cli() -> Command {
    Command::new("Pool Analyzer")
        .version("1.0")
        .about("Holder concentration of a single token pool")
        .arg(Arg::new("address")
            .short('a')
            .long("address")
            .value_name("POOL_ADDRESS")
            .required(true))
        .arg(Arg::new("symbol")
            .short('s')
            .long("symbol")
            .value_name("TOKEN_SYMBOL")
            .required(true))
        .arg(Arg::new("start-block")
            .long("start-block")
            .value_name("BLOCK"))
        .arg(Arg::new("end-block")
            .long("end-block")
            .value_name("BLOCK"))
        .arg(Arg::new("top")
            .long("top")
            .value_name("N")
            .value_parser(clap::value_parser!(usize))
            .help("Also list the N largest holders"))
}

fn config_from(matches: &ArgMatches) -> Result<AnalysisConfig> {
    let address = matches.get_one::<String>("address").map(String::as_str).unwrap_or_default();
    let symbol = matches.get_one::<String>("symbol").map(String::as_str).unwrap_or_default();
    let pool = parse_pool(&format!("{}:{}", address, symbol))?;
    let mut config =
        AnalysisConfig::from_env_for_pool(pool).context("Error loading configuration")?;

    if let Some(block) = matches.get_one::<String>("start-block") {
        config.start_block = parse_block("START_BLOCK", block)?;
    }
    if let Some(block) = matches.get_one::<String>("end-block") {
        config.end_block = parse_block("END_BLOCK", block)?;
    }
    config.validate()?;
    Ok(config)
}

fn write_top_holders<W: Write>(out: &mut W, distribution: &Distribution, n: usize) -> io::Result<()> {
    for (i, holder) in distribution.holders.iter().take(n).enumerate() {
        writeln!(
            out,
            "{:>4}. {} {} tokens ({:.4}%)",
            i + 1,
            holder.address,
            holder.balance,
            holder.percent
        )?;
    }
    Ok(())
}

async fn run() -> Result<()> {
    let matches = cli().get_matches();
    let config = config_from(&matches)?;
    let pool = &config.pools[0];

    let source = EtherscanClient::new(&config);
    let distribution = analyze_pool(&source, pool).await?;
    debug!("{} holders in {}", distribution.holders.len(), pool.address);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &distribution)?;
    if let Some(n) = matches.get_one::<usize>("top") {
        write_top_holders(&mut out, &distribution, *n)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    pool_check::logging::init();

    if let Err(e) = run().await {
        println!("{:#}", e);
        std::process::exit(1);
    }
}
