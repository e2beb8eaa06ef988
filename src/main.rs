use clap::Parser;
use color_eyre::Result;
use zerto_usage::{
    init_errors,
    init_logging,
    App,
    Args,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets may live in a local .env file.
    let _ = dotenvy::dotenv();

    init_errors()?;
    let args = Args::parse();
    init_logging(args.verbose)?;
    App::new(args)?.run().await
}
