use anyhow::Context;
use recall_config::RecallConfig;

/// Load `.env`, then the layered configuration.
pub fn load_config() -> anyhow::Result<RecallConfig> {
    RecallConfig::load_with_dotenv().context("failed to load recall configuration")
}
