//! Vigía server binary.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use vigia_server::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    vigia_server::start_server(config).await
}
