use std::sync::Arc;

use anyhow::Context;
use figment::Figment;
use figment::providers::Serialized;
use lens_client::HttpTransport;
use lens_config::LensConfig;
use lens_session::Session;

use crate::cli::GlobalFlags;

/// Session type every command drives.
pub type AppSession = Session<HttpTransport>;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<LensConfig> {
    let config = LensConfig::load_with_dotenv(|figment| apply_overrides(figment, flags))
        .context("failed to load uxlens configuration")?;

    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");
    Ok(config)
}

pub fn session(config: &LensConfig) -> anyhow::Result<AppSession> {
    let transport = HttpTransport::new(&config.api).context("failed to build HTTP client")?;
    Ok(Session::new(Arc::new(transport), &config.chat))
}

/// Layer command-line flags over every configured source.
fn apply_overrides(figment: Figment, flags: &GlobalFlags) -> Figment {
    match &flags.base_url {
        Some(base_url) => figment.merge(Serialized::default("api.base_url", base_url)),
        None => figment,
    }
}
