//! Commands module - CLI command implementations, one module per subcommand.

pub mod jobs;
pub mod migrate;
pub mod usuarios;

use crate::cli::Commands;
use crate::config::Config;
use crate::errors::AppResult;

/// Run one parsed subcommand
pub async fn execute(command: Commands, config: Config) -> AppResult<()> {
    match command {
        Commands::Migrate(args) => migrate::execute(args, config).await,
        Commands::Jobs(args) => jobs::execute(args, config).await,
        Commands::Usuarios(args) => usuarios::execute(args, config).await,
    }
}
