use clap::Parser;

use diary_bootstrap::{
    conf::{self, AppConfig},
    fixtures::wipe,
    utils::o11y::{as_error, init_tracing, log_error},
};

#[derive(Parser)]
#[command(about = "Delete every document from the Training Diary collections")]
struct Cli {
    #[arg(long, default_value = conf::DEFAULT_CONFIG_FILE, help = "Path to the config file")]
    config: String,
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

    if wipe(&db)
        .await
        .inspect_err(as_error!("error wiping collections"))
        .is_err()
    {
        std::process::exit(1);
    }
}
