//! Policy resolution from preset names and JSON files.

use std::path::Path;

use serde::Deserialize;

use super::{Policy, PolicyBuilder, Rule, preset};
use crate::error::PolicyError;

/// On-disk form. Becomes a [`Policy`] only through [`PolicyBuilder::build`].
#[derive(Debug, Deserialize)]
struct PolicyFile {
    name: String,
    #[serde(default)]
    rules: Vec<Rule>,
}

/// Resolves a preset name first, then falls back to reading a JSON file.
///
/// # Errors
///
/// Returns error if:
/// - The name is neither a preset nor an existing file
/// - The file cannot be read or is not a valid policy document
/// - Any rule is invalid
pub fn load_policy(name_or_file: &str) -> Result<Policy, PolicyError> {
    if let Some(policy) = preset(name_or_file) {
        #[cfg(feature = "tracing")]
        tracing::debug!("Policy preset resolved: {}", policy.name());
        return Ok(policy);
    }

    let path = Path::new(name_or_file);
    if path.is_file() {
        return load_policy_file(path);
    }

    Err(PolicyError::UnknownPreset(name_or_file.to_string()))
}

/// Reads and validates a JSON policy file:
///
/// ```json
/// {"name": "corp", "rules": [{"kind": "min_length", "value": 12}, {"kind": "forbid_common"}]}
/// ```
pub fn load_policy_file<P: AsRef<Path>>(path: P) -> Result<Policy, PolicyError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| PolicyError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let file: PolicyFile =
        serde_json::from_str(&content).map_err(|source| PolicyError::ParseError {
            path: path.to_path_buf(),
            source,
        })?;

    let policy = PolicyBuilder::new(file.name).rules(file.rules).build()?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Policy {} loaded from {:?}: {} rules",
        policy.name(),
        path,
        policy.rules().len()
    );

    Ok(policy)
}
