use anyhow::Result;
use clap::Parser;
use common::{Config, GenerationFailureMode};
use std::path::{Path, PathBuf};

use postgen::fallback::build_fallback;
use postgen::generator::PostGenerator;
use postgen::server::GENERATE_DEFAULT_TOPIC;

/// Run the post pipeline once and print the result.
#[derive(Parser, Debug)]
#[command(name = "generate_once")]
struct Args {
    #[arg(long, default_value = GENERATE_DEFAULT_TOPIC)]
    topic: String,

    /// Read only this file instead of config.default.toml + config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the headlines instead of generating a post
    #[arg(long)]
    news_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path).await?,
        None => {
            Config::load_with_defaults(Some(Path::new("config.default.toml")), Some(Path::new("config.toml")))
                .await?
        }
    };
    config.validate()?;

    let credentials = config.resolve_credentials();
    let generator = PostGenerator::from_config(&config, &credentials)?;

    if args.news_only {
        for headline in generator.headlines(&args.topic).await? {
            println!("- {}", headline);
        }
        return Ok(());
    }

    match generator.generate_post_text(&args.topic).await {
        Ok(text) => println!("{}", text),
        Err(err) => match config.generation.failure_mode {
            GenerationFailureMode::Fallback => {
                println!("{}", build_fallback(&args.topic, &err.fallback_reason()));
            }
            GenerationFailureMode::Propagate => {
                anyhow::bail!("{}: {}", err.kind(), err);
            }
        },
    }

    Ok(())
}
