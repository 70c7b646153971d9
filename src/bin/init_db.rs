use clap::Parser;

use diary_bootstrap::{
    bootstrap::bootstrap,
    conf::{self, AppConfig},
    utils::{
        enums::OnExisting,
        o11y::{init_tracing, log_error},
    },
};

#[derive(Parser)]
#[command(about = "Create the Training Diary collections, validators and indexes")]
struct Cli {
    #[arg(long, default_value = conf::DEFAULT_CONFIG_FILE, help = "Path to the config file")]
    config: String,
    #[arg(
        long,
        value_enum,
        default_value_t,
        help = "What to do when a collection already exists"
    )]
    on_existing: OnExisting,
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let args = Cli::parse();

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

    if let Err(e) = bootstrap(&db, args.on_existing).await {
        log_error!(e, "database initialization failed");
        std::process::exit(1);
    }
}
