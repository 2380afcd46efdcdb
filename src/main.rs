use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tweet_display::{
    Cache, FeedKind, FileCache, HttpFetcher, MemoryCache, TweetDisplay, WidgetConfig,
};

#[derive(Parser)]
struct Args {
    /// Widget configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Account to display, overrides the configuration
    #[arg(short, long)]
    screen_name: Option<String>,

    /// Feed to display, overrides the configuration
    #[arg(short, long, value_enum)]
    feed: Option<FeedKind>,

    /// Number of tweets to display
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Directory for cached API responses; kept in memory when omitted
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Widget instance id used to namespace cache entries
    #[arg(long, default_value_t = 1)]
    module_id: u64,

    /// API bearer token
    #[arg(long, env = "TWITTER_BEARER_TOKEN", hide_env_values = true)]
    bearer_token: Option<String>,
}

fn load_config(args: &Args) -> Result<WidgetConfig, tweet_display::WidgetError> {
    let mut config = match &args.config {
        Some(path) => WidgetConfig::load(path)?,
        None => WidgetConfig::default(),
    };
    if let Some(name) = &args.screen_name {
        config.screen_name = name.clone();
    }
    if let Some(feed) = args.feed {
        config.feed = feed;
    }
    if let Some(count) = args.count {
        config.count = count;
    }
    if args.bearer_token.is_some() {
        config.bearer_token = args.bearer_token.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    let fetcher = match HttpFetcher::from_config(&config) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };
    let cache: Box<dyn Cache> = match &args.cache_dir {
        Some(dir) => match FileCache::new(dir) {
            Ok(c) => Box::new(c),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Box::new(MemoryCache::new()),
    };

    let rendered = TweetDisplay::builder()
        .fetcher(&fetcher)
        .cache(cache.as_ref())
        .config(&config)
        .module_id(args.module_id)
        .build()
        .render()
        .await;

    let json = match serde_json::to_string_pretty(&rendered) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = writeln!(std::io::stdout(), "{}", json) {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if rendered.is_error() {
        ExitCode::from(10)
    } else {
        ExitCode::SUCCESS
    }
}
