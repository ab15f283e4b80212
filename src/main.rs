use asn_cidr_summary::cli::Cli;
use asn_cidr_summary::{init_logging, run};
use clap::Parser;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    init_logging("log4rs.yml")?;
    log::info!("#Start main()");

    let cli = Cli::parse();
    run(cli).await?;

    log::info!("#End main()");
    Ok(())
}
