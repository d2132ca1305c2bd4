mod config;
mod gap;
mod memory;
mod model;
mod seeder;
mod store;
mod timezone;
mod timing;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{error, info};

use config::Config;
use memory::MemoryStore;
use seeder::{DemoSeeder, DEMO_USERNAME};
use store::{AccountDirectory, ShiftRepository};
use timezone::LocalTimeConverter;

/// Parse command line arguments
struct Args {
    reset: bool,
    reset_shifts: bool,
    json: bool,
    validate: bool,
    seed: Option<u64>,
    help: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut result = Args {
        reset: false,
        reset_shifts: false,
        json: false,
        validate: false,
        seed: None,
        help: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--reset" => result.reset = true,
            "--reset-shifts" => result.reset_shifts = true,
            "--json" => result.json = true,
            "--validate" => result.validate = true,
            "--seed" => {
                if i + 1 < args.len() {
                    i += 1;
                    result.seed = args[i].parse().ok();
                }
            }
            "--help" | "-h" => result.help = true,
            _ => {}
        }
        i += 1;
    }

    result
}

fn print_help() {
    println!("Tipseed - demo work-history generator\n");
    println!("USAGE:");
    println!("    tipseed [OPTIONS]\n");
    println!("OPTIONS:");
    println!("    --reset         Delete the demo user and reseed from scratch");
    println!("    --reset-shifts  Delete only the shift history, then reseed");
    println!("    --json          Print the generated history as JSON");
    println!("    --seed N        Fix the random seed for a reproducible run");
    println!("    --validate      Validate configuration and exit");
    println!("    --help, -h      Show this help message\n");
    println!("ENVIRONMENT:");
    println!("    DEMO_USER_PASSWORD  Password for the demo account");
    println!("    DEMO_TIMEZONE       IANA timezone id (default: Pacific)");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args();

    if args.help {
        print_help();
        return Ok(());
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tipseed=info".parse().unwrap()),
        )
        .init();

    info!("Tipseed demo seeder v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");
    info!(
        "  Timezone: {}",
        config.timezone.as_deref().unwrap_or("(default: Pacific)")
    );

    // Handle --validate mode
    if args.validate {
        info!("Validating configuration...");
        match config.validate() {
            Ok(()) => {
                info!("Configuration is valid");
                return Ok(());
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let converter = LocalTimeConverter::new(config.timezone.as_deref());
    info!("  Resolved timezone: {}", converter.zone().name());

    let store = Arc::new(MemoryStore::new());
    let demo_seeder = DemoSeeder::new(
        store.clone(),
        store.clone(),
        converter,
        config.demo_password.clone(),
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = if args.reset {
        demo_seeder.reset_demo_user(&mut rng).await?
    } else if args.reset_shifts {
        // Against a fresh in-memory store there is nothing to reset until a
        // first seeding has run; do that first so the flag demonstrates the
        // clear-and-regenerate path.
        demo_seeder.seed_demo_data(&mut rng).await?;
        demo_seeder.reset_demo_user_shifts(&mut rng).await?
    } else {
        demo_seeder.seed_demo_data(&mut rng).await?
    };

    info!(
        "Considered {} dates, added {} shifts",
        report.dates_considered, report.shifts_added
    );

    // Report the generated history
    let account = match store.find_by_username(DEMO_USERNAME).await? {
        Some(account) => account,
        None => {
            error!("Demo account was not created; nothing to report");
            std::process::exit(1);
        }
    };
    let mut shifts = store.shifts_for_user(&account.id, None, None).await?;
    shifts.sort_by_key(|s| s.date);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&shifts)?);
    } else {
        println!("Generated {} shifts for '{}':", shifts.len(), account.username);
        for shift in &shifts {
            println!(
                "  {}  {:>2}h  credit ${:>6.2}  cash ${:>6.2}  tipout ${:>5.2}",
                shift.date.format("%Y-%m-%d %H:%M UTC"),
                shift.hours_worked,
                shift.credit_tips,
                shift.cash_tips,
                shift.tipout
            );
        }
    }

    Ok(())
}
