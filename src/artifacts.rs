//! Hardhat build outputs: creation bytecode and the standard-JSON compiler input
//! the explorer needs to rebuild a contract.

use alloy::primitives::Bytes;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// `contracts/IVMToken.sol:IVMToken` split into source file and contract name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractRef {
    pub source: String,
    pub name: String,
}

impl ContractRef {
    pub fn parse(qualified: &str) -> Result<Self> {
        let (source, name) = qualified
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| anyhow!("contract `{qualified}` is not of the form <path>:<Name>"))?;
        if source.is_empty() || name.is_empty() {
            return Err(anyhow!("contract `{qualified}` is not of the form <path>:<Name>"));
        }
        Ok(Self {
            source: source.to_string(),
            name: name.to_string(),
        })
    }

    pub fn qualified(&self) -> String {
        format!("{}:{}", self.source, self.name)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    bytecode: String,
}

/// Contents of a `build-info/*.json` file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub solc_long_version: String,
    pub input: serde_json::Value,
}

impl BuildInfo {
    pub fn has_source(&self, source: &str) -> bool {
        self.input
            .get("sources")
            .and_then(|sources| sources.get(source))
            .is_some()
    }

    /// Compiler version string in the form the explorer expects (`v0.8.20+commit...`).
    pub fn compiler_version(&self) -> String {
        if self.solc_long_version.starts_with('v') {
            self.solc_long_version.clone()
        } else {
            format!("v{}", self.solc_long_version)
        }
    }
}

#[derive(Clone, Debug)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn artifact_path(&self, contract: &ContractRef) -> PathBuf {
        self.root
            .join(&contract.source)
            .join(format!("{}.json", contract.name))
    }

    pub fn creation_code(&self, contract: &ContractRef) -> Result<Bytes> {
        let path = self.artifact_path(contract);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        let artifact: HardhatArtifact = serde_json::from_str(&raw)
            .with_context(|| format!("malformed artifact {}", path.display()))?;
        if artifact.contract_name != contract.name {
            return Err(anyhow!(
                "artifact {} describes `{}`, expected `{}`",
                path.display(),
                artifact.contract_name,
                contract.name
            ));
        }
        let code = alloy::hex::decode(artifact.bytecode.trim())
            .with_context(|| format!("bytecode in {} is not plain hex (unlinked library?)", path.display()))?;
        if code.is_empty() {
            return Err(anyhow!(
                "`{}` has no creation bytecode (abstract contract or interface?)",
                contract.qualified()
            ));
        }
        Ok(Bytes::from(code))
    }

    /// Find the build-info whose compiler input contains `contract.source`.
    pub fn build_info(&self, contract: &ContractRef) -> Result<BuildInfo> {
        let dir = self.root.join("build-info");
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("failed to list {}", dir.display()))?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        candidates.sort();

        for path in candidates {
            let raw = match fs::read_to_string(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::warn!("[ARTIFACTS] skipping {}: {}", path.display(), err);
                    continue;
                }
            };
            let info: BuildInfo = match serde_json::from_str(&raw) {
                Ok(info) => info,
                Err(err) => {
                    tracing::warn!("[ARTIFACTS] skipping {}: {}", path.display(), err);
                    continue;
                }
            };
            if info.has_source(&contract.source) {
                return Ok(info);
            }
        }
        Err(anyhow!(
            "no build-info in {} contains {}",
            dir.display(),
            contract.source
        ))
    }
}
