//! Serve command: run the HTTP API

use super::shared::open_store;
use crate::app::api::{self, AppState};
use crate::cli::args::{Args, ServeArgs};
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

pub async fn run_serve(args: &Args, cmd: ServeArgs) -> Result<()> {
    let mut config = args.load_config()?;
    if let Some(bind) = cmd.bind {
        config = config.with_bind(bind);
    }

    let store = open_store(&config)?;
    info!("Using database {}", config.database_path.display());

    let state = AppState::new(&config, Arc::new(store));
    api::serve(state, config.server.bind).await
}
