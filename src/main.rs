//! Deployment flow: deploy IVMToken, wait for confirmation depth, initialise
//! allocations, then submit the token for explorer verification.

use anyhow::{Context, Result};
use ivm_deployer::artifacts::{ArtifactStore, ContractRef};
use ivm_deployer::deploy::{DeploymentDriver, DeploymentSettings};
use ivm_deployer::runtime::{init_runtime, parse_cli_args, CliSpec};
use ivm_deployer::utils::config::Config;
use ivm_deployer::utils::rpc::{build_signer, signing_chain};
use ivm_deployer::verify::{explorer_service, VerificationSubmitter};

fn print_usage() {
    eprintln!(
        "usage: ivm_deployer [--network <name>]\n\
         env: NETWORK, PRIVATE_KEY, <NETWORK>_RPC_URL or RPC_URL, ETHERSCAN_API_KEY,\n\
         MARKETING_WALLET, DEVELOPMENT_WALLET, TEAM_WALLET, RESERVE_WALLET, LOYALTY_WALLET"
    );
}

async fn run(network: Option<&str>) -> Result<()> {
    let config = Config::load(network)?;
    config.beneficiaries.validate()?;

    let signer = build_signer(config.require_private_key()?)?;
    tracing::info!(
        "[DEPLOY] Deployer: {} on {} ({})",
        signer.address(),
        config.network.name,
        config.rpc_url
    );

    let contract = ContractRef::parse(&config.token_contract)?;
    let creation_code = ArtifactStore::new(config.artifacts_dir.clone())
        .creation_code(&contract)
        .context("run `npx hardhat compile` first")?;

    let chain = signing_chain(&config.rpc_url, signer, config.rpc_call_timeout)?;
    let service = explorer_service(&config, &chain).await?;
    let submitter = VerificationSubmitter::new(config.network.clone(), service);

    let settings = DeploymentSettings {
        network: config.network.clone(),
        beneficiaries: config.beneficiaries.clone(),
        creation_code,
        token_contract: Some(config.token_contract.clone()),
        poll_interval: config.receipt_poll_interval,
    };
    let report = DeploymentDriver::new(&chain, &submitter, settings)
        .run()
        .await?;

    tracing::info!("[DEPLOY] IVM deployed at: {:#x}", report.token);
    tracing::info!("[DEPLOY] Verification: {}", report.verification);
    println!("{:#x}", report.token);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_cli_args(CliSpec::default()).inspect_err(|_| print_usage())?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_runtime();
    run(args.network.as_deref()).await.inspect_err(|err| {
        tracing::error!("[DEPLOY] Deployment failed: {err:#}");
    })
}
