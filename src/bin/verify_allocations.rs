use anyhow::{anyhow, Result};
use ivm_deployer::audit::AuditDriver;
use ivm_deployer::runtime::{init_runtime, parse_cli_args, CliSpec};
use ivm_deployer::utils::config::Config;
use ivm_deployer::utils::rpc::read_only_chain;
use ivm_deployer::verify::{explorer_service, VerificationSubmitter};

fn print_usage() {
    eprintln!(
        "usage: verify_allocations [--network <name>] [--token <0x...>]\n\
         env fallback: IVM_TOKEN_ADDRESS; needs ETHERSCAN_API_KEY to submit"
    );
}

async fn run(network: Option<&str>, token: Option<String>) -> Result<()> {
    let config = Config::load(network)?;
    let token = token
        .filter(|raw| !raw.trim().is_empty())
        .or_else(|| config.token_address.clone())
        .ok_or_else(|| anyhow!("--token (or IVM_TOKEN_ADDRESS env) is required"))?;

    let chain = read_only_chain(&config.rpc_url, config.rpc_call_timeout)?;
    let service = explorer_service(&config, &chain).await?;
    let submitter = VerificationSubmitter::new(config.network.clone(), service);

    let report = AuditDriver::new(&chain, &submitter)
        .run(token.trim())
        .await?;
    for (role, outcome) in &report.outcomes {
        tracing::info!("[AUDIT] {:<18} {}", role.label(), outcome);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_cli_args(CliSpec {
        accepts_token: true,
    })
    .inspect_err(|_| print_usage())?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_runtime();
    run(args.network.as_deref(), args.token)
        .await
        .inspect_err(|err| tracing::error!("[AUDIT] Verification pass failed: {err:#}"))
}
