mod args;
use crate::args::{Args, Commands};

use clap::Parser;
use env_logger::Env;
use tenderly::{api::ApiClient, config::HostConfig, host::FsHost, tenderly::Tenderly};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let Args {
        command,
        config,
        network,
    } = Args::parse();

    let mut config = HostConfig::from_file(&config)?;
    if network.is_some() {
        config.network = network;
    }

    let host = FsHost::from_config(&config.paths);
    let api = ApiClient::from_config(&config.tenderly)?;
    let tenderly = Tenderly::new(host, api, config);

    match command {
        Commands::Verify(args) => tenderly.verify(&args.contracts, args.tag).await,
        Commands::Push(args) => tenderly.push(&args.contracts, args.tag).await,
        Commands::Persist(args) => {
            let written = tenderly.persist_artifacts(&args.contracts).await?;
            if written.is_empty() {
                println!("No compiled artifacts found for the given contracts");
            }
        }
    }

    Ok(())
}
