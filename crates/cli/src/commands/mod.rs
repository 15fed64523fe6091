//! Subcommand implementations

pub mod config;
pub mod doctor;
pub mod history;
pub mod run;

use anyhow::{Context, Result, bail};
use secrecy::SecretString;

/// Read a required secret from the environment.
pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No env var configured for {}", provider);
    }

    let key = std::env::var(env_var)
        .with_context(|| format!("Missing env var {} for {}", env_var, provider))?;

    if key.trim().is_empty() {
        bail!("Env var {} is empty for {}", env_var, provider);
    }

    Ok(SecretString::new(key.into()))
}

/// Read an optional secret; unset or blank disables the provider
pub(crate) fn optional_api_key(env_var: &str) -> Option<SecretString> {
    if env_var.trim().is_empty() {
        return None;
    }

    std::env::var(env_var)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .map(|key| SecretString::new(key.into()))
}

/// Whether an env var is set to something non-blank, without reading it further
pub(crate) fn env_is_set(env_var: &str) -> bool {
    !env_var.trim().is_empty()
        && std::env::var(env_var)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
}

/// Configured base URL override, if any
pub(crate) fn base_url_override(base_url: &str) -> Option<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
