use async_trait::async_trait;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::artifacts::{ArtifactStore, BuildInfo, ContractRef};
use crate::verify::{ServiceRejection, VerificationRequest, VerificationService};

const ETHERSCAN_API_BASE: &str = "https://api.etherscan.io/v2/api";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_STATUS_CHECKS: u32 = 12;
const PENDING_MARKER: &str = "Pending in queue";

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    message: String,
    result: String,
}

impl EtherscanResponse {
    /// Explorer text kept verbatim, so the already-verified markers still match.
    fn rejection(&self) -> ServiceRejection {
        if self.message.is_empty() {
            ServiceRejection::new(self.result.clone())
        } else {
            ServiceRejection::new(format!("{}: {}", self.message, self.result))
        }
    }
}

/// `verifysourcecode` answer: the job GUID, or the explorer's refusal.
fn interpret_submission(body: &EtherscanResponse) -> Result<String, ServiceRejection> {
    if body.status == "1" {
        Ok(body.result.clone())
    } else {
        Err(body.rejection())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum StatusStep {
    Verified,
    Pending,
    Rejected(ServiceRejection),
}

fn interpret_status(body: &EtherscanResponse) -> StatusStep {
    if body.result.contains(PENDING_MARKER) {
        StatusStep::Pending
    } else if body.status == "1" {
        StatusStep::Verified
    } else {
        StatusStep::Rejected(body.rejection())
    }
}

/// Check a job until it leaves the queue, at most `max_checks` times.
async fn poll_status<F, Fut>(
    guid: &str,
    interval: Duration,
    max_checks: u32,
    mut fetch: F,
) -> Result<(), ServiceRejection>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<EtherscanResponse, ServiceRejection>>,
{
    for check in 1..=max_checks {
        tokio::time::sleep(interval).await;
        match interpret_status(&fetch().await?) {
            StatusStep::Verified => return Ok(()),
            StatusStep::Rejected(rejection) => return Err(rejection),
            StatusStep::Pending => {
                tracing::debug!("[VERIFY] guid {} pending (check {}/{})", guid, check, max_checks);
            }
        }
    }
    Err(ServiceRejection::new(format!(
        "verification {guid} still pending after {max_checks} status checks"
    )))
}

/// Etherscan v2 verification for one chain.
///
/// Submission is a single `verifysourcecode` POST; what follows is status polling
/// on the returned GUID, bounded by `MAX_STATUS_CHECKS`.
pub struct EtherscanClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    chain_id: u64,
    artifacts: ArtifactStore,
    default_contract: String,
}

impl EtherscanClient {
    pub fn new(
        api_key: impl Into<String>,
        chain_id: u64,
        artifacts: ArtifactStore,
        default_contract: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: ETHERSCAN_API_BASE.to_string(),
            api_key: api_key.into(),
            chain_id,
            artifacts,
            default_contract: default_contract.into(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}?chainid={}", self.api_base, self.chain_id)
    }

    fn load_build(&self, qualified: &str) -> Result<(ContractRef, BuildInfo), ServiceRejection> {
        let contract = ContractRef::parse(qualified)
            .map_err(|err| ServiceRejection::new(err.to_string()))?;
        let build = self
            .artifacts
            .build_info(&contract)
            .map_err(|err| ServiceRejection::new(format!("{err:#}")))?;
        Ok((contract, build))
    }

    async fn read_response(
        response: reqwest::Result<reqwest::Response>,
    ) -> Result<EtherscanResponse, ServiceRejection> {
        let response = response
            .map_err(|err| ServiceRejection::new(format!("explorer request failed: {err}")))?;
        if !response.status().is_success() {
            return Err(ServiceRejection::new(format!(
                "explorer returned HTTP {}",
                response.status()
            )));
        }
        response
            .json::<EtherscanResponse>()
            .await
            .map_err(|err| ServiceRejection::new(format!("malformed explorer response: {err}")))
    }

    async fn submit_source(
        &self,
        request: &VerificationRequest,
        contract: &ContractRef,
        build: &BuildInfo,
    ) -> Result<String, ServiceRejection> {
        let source_code = serde_json::to_string(&build.input)
            .map_err(|err| ServiceRejection::new(format!("cannot encode compiler input: {err}")))?;
        let address = format!("{:#x}", request.address);
        let constructor_args = alloy::hex::encode(&request.constructor_args);
        let compiler_version = build.compiler_version();
        let contract_name = contract.qualified();
        let form = [
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", source_code.as_str()),
            ("codeformat", "solidity-standard-json-input"),
            ("contractname", contract_name.as_str()),
            ("compilerversion", compiler_version.as_str()),
            // Field name is misspelled in the explorer API.
            ("constructorArguements", constructor_args.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoint())
            .timeout(HTTP_TIMEOUT)
            .form(&form)
            .send()
            .await;
        interpret_submission(&Self::read_response(response).await?)
    }

    async fn fetch_status(&self, guid: &str) -> Result<EtherscanResponse, ServiceRejection> {
        let response = self
            .http
            .get(self.endpoint())
            .timeout(HTTP_TIMEOUT)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
            ])
            .send()
            .await;
        Self::read_response(response).await
    }
}

#[async_trait]
impl VerificationService for EtherscanClient {
    async fn submit(&self, request: &VerificationRequest) -> Result<(), ServiceRejection> {
        let qualified = request
            .contract_path
            .as_deref()
            .unwrap_or(&self.default_contract);
        let (contract, build) = self.load_build(qualified)?;
        let guid = self.submit_source(request, &contract, &build).await?;
        tracing::info!("[VERIFY] {:#x} submitted, guid {}", request.address, guid);
        poll_status(&guid, STATUS_POLL_INTERVAL, MAX_STATUS_CHECKS, || {
            self.fetch_status(&guid)
        })
        .await
    }
}
