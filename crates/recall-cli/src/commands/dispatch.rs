use recall_config::RecallConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    config: &RecallConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Session(args) => commands::session::handle(&args, config, flags).await,
        Commands::Rank(args) => commands::rank::handle(&args, config, flags).await,
        Commands::Whoami => commands::whoami::handle(config, flags).await,
    }
}
