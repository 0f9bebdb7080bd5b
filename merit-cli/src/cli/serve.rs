use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use crate::{
    cli::DispatchArgs,
    prelude::*,
    server::{AppState, archive::Archive, router, shutdown_signal},
};

#[derive(Parser)]
pub struct ServeArgs {
    #[clap(long, default_value = "0.0.0.0:8888", env = "BIND_ADDRESS")]
    pub bind_address: String,

    /// Also save every production plan served into this directory.
    #[clap(long, env = "ARCHIVE_DIRECTORY")]
    pub archive_directory: Option<PathBuf>,
}

pub async fn serve(args: ServeArgs, dispatch: DispatchArgs) -> Result {
    info!(args.bind_address, %dispatch.emission_factor, "binding…");
    let listener =
        TcpListener::bind(&args.bind_address).await.context("failed to bind to the address")?;
    let state = AppState {
        emission_factor: dispatch.emission_factor,
        archive: args.archive_directory.map(Archive::new),
    };

    info!("serving…");
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
