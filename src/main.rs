use clap::Parser;

mod cli;
mod config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = cli::CliArgs::parse();
    cli::run(args).await
}
