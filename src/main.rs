use std::fs::File;
use std::path::PathBuf;

use banter::core::config;
use banter::core::reply::ReplyBook;
use clap::Parser;
use log::warn;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "banter", about = "Terminal chat widget with canned replies")]
struct Args {
    /// Render replies as literal text instead of Markdown
    #[arg(long)]
    plain: bool,

    /// Path to a replies JSON file (defaults to the built-in book)
    #[arg(long, value_name = "FILE")]
    replies: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to banter.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("banter.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Falling back to default config: {e}");
        config::BanterConfig::default()
    });
    let config = config::resolve(&file_config, args.plain, args.replies.as_deref());

    let replies = match &config.replies_file {
        Some(path) => ReplyBook::from_file(path).unwrap_or_else(|e| {
            warn!("Falling back to embedded replies: {e}");
            ReplyBook::embedded()
        }),
        None => ReplyBook::embedded(),
    };

    log::info!("Banter starting up");

    banter::tui::run(config, replies)
}
