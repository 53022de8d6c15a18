#![allow(clippy::doc_markdown)]
#![doc = include_str!("../../README.md")]

mod analytics;
mod api;
mod cli;
mod core;
mod fleet;
mod prelude;
mod store;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Analyse(args) => args.run().await?,
        Command::Fleet(args) => args.run().await?,
    }

    info!("done!");
    Ok(())
}
