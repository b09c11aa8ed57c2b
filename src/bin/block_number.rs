use anyhow::Result;
use ivm_deployer::chain::ChainClient;
use ivm_deployer::runtime::{init_runtime, parse_cli_args, CliSpec};
use ivm_deployer::utils::config::Config;
use ivm_deployer::utils::rpc::read_only_chain;

fn print_usage() {
    eprintln!("usage: block_number [--network <name>]");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_cli_args(CliSpec::default()).inspect_err(|_| print_usage())?;
    if args.help {
        print_usage();
        return Ok(());
    }
    init_runtime();

    let result = async {
        let config = Config::load(args.network.as_deref())?;
        let chain = read_only_chain(&config.rpc_url, config.rpc_call_timeout)?;
        let head = chain.block_number().await?;
        println!("Current block number: {head}");
        anyhow::Ok(())
    }
    .await;
    result.inspect_err(|err| tracing::error!("[CHAIN] block number query failed: {err:#}"))
}
