use std::path::PathBuf;

use clap::Parser;

use diary_bootstrap::{
    conf::{self, AppConfig},
    fixtures::{FixtureSet, import_fixtures},
    utils::o11y::{init_tracing, log_error},
};

#[derive(Parser)]
#[command(about = "Replace the Training Diary collections' contents with fixture files")]
struct Cli {
    #[arg(long, default_value = conf::DEFAULT_CONFIG_FILE, help = "Path to the config file")]
    config: String,
    #[arg(long, default_value = "data", help = "Directory holding the JSON files")]
    dir: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let args = Cli::parse();

    let set = match FixtureSet::load(&args.dir) {
        Ok(set) => set,
        Err(e) => {
            log_error!(e, "error reading fixtures from {}", args.dir.display());
            std::process::exit(1);
        }
    };

    let config = match AppConfig::from_path(&args.config) {
        Ok(config) => config,
        Err(e) => {
            log_error!(e, "error loading config file {}", args.config);
            std::process::exit(1);
        }
    };

    let db = match conf::db_from_config(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            log_error!(e, "error building db");
            std::process::exit(1);
        }
    };

    if let Err(e) = import_fixtures(&db, &set).await {
        log_error!(e, "error loading fixtures");
        std::process::exit(1);
    }
}
