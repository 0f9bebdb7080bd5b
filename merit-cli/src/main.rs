#![allow(clippy::doc_markdown)]
#![doc = include_str!("../../README.md")]

mod cli;
mod core;
mod prelude;
mod server;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, plan, serve},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Serve(serve_args) => {
            serve(serve_args, args.dispatch).await?;
        }
        Command::Plan(plan_args) => {
            plan(&plan_args, args.dispatch)?;
        }
    }

    info!("done!");
    Ok(())
}
