use clap::Parser;
use minidis::{config::Config, server, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    server::run(config).await
}
