use clap::Parser;
use xmin_server::app::{self, AppConfiguration};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct ServerArguments {
    #[arg(long, help = "path to a TOML or JSON configuration file")]
    config: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = ServerArguments::parse();
    let config = match &args.config {
        None => AppConfiguration::default(),
        Some(f) => {
            log::info!("reading xmin configuration from {f}");
            match AppConfiguration::try_from(f) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("failed reading configuration: {e}");
                    std::process::exit(1);
                }
            }
        }
    };
    if let Err(e) = app::serve(config).await {
        log::error!("xmin-server failed: {e}");
        std::process::exit(1);
    }
}
