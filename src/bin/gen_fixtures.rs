use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use diary_bootstrap::{
    fixtures::{FIXTURE_BCRYPT_COST, FixtureSet},
    utils::o11y::{init_tracing, log_error},
};

#[derive(Parser)]
#[command(about = "Generate Training Diary sample data as JSON files")]
struct Cli {
    #[arg(long, default_value_t = 10, help = "Number of users to generate")]
    users: usize,
    #[arg(long, default_value_t = 12, help = "Days of trainings per user")]
    days: u32,
    #[arg(long, default_value = "data", help = "Directory to write the JSON files to")]
    out: PathBuf,
}

fn main() {
    if let Err(e) = init_tracing() {
        eprintln!("failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let args = Cli::parse();
    let today = chrono::Local::now().date_naive();

    let set = match FixtureSet::generate(
        &mut rand::thread_rng(),
        args.users,
        args.days,
        today,
        FIXTURE_BCRYPT_COST,
    ) {
        Ok(set) => set,
        Err(e) => {
            log_error!(e, "error generating fixtures");
            std::process::exit(1);
        }
    };

    if let Err(e) = set.save(&args.out) {
        log_error!(e, "error writing fixtures to {}", args.out.display());
        std::process::exit(1);
    }

    info!(
        users = set.users.len(),
        trainings = set.trainings.len(),
        friendships = set.friendships.len(),
        dir = %args.out.display(),
        "fixtures written"
    );
}
