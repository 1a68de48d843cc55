pub mod dispatch;
pub mod rank;
pub mod session;
pub mod whoami;

use anyhow::Context;
use recall_config::RecallConfig;
use recall_source::WaniKaniClient;

/// Authenticated client from the `wanikani` config section.
fn wanikani_client(config: &RecallConfig) -> anyhow::Result<WaniKaniClient> {
    let wanikani = config
        .require_wanikani()
        .context("set RECALL_WANIKANI__API_TOKEN or wanikani.api_token in config.toml")?;
    WaniKaniClient::new(wanikani).context("failed to build the WaniKani client")
}
