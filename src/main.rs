use clap::Parser;
use parley::core::config;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "parley", about = "Terminal chat client for a research-agent backend")]
struct Args {
    /// Server base URL (e.g. http://localhost:8000)
    #[arg(short, long)]
    server: Option<String>,
    /// User identifier sent with document uploads
    #[arg(short, long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger; the terminal itself is the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("parley.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("parley: {e}");
            std::process::exit(1);
        }
    };
    let resolved = config::resolve(&file_config, args.server.as_deref(), args.user.as_deref());

    log::info!("Parley starting up against {}", resolved.server_url);

    parley::tui::run(resolved)
}
