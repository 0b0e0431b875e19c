use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use licenselock::config::Config;
use licenselock::error::AppError;
use licenselock::services::Services;
use licenselock::store::{SqliteBackend, Store, create_pool, init_store};

#[derive(Parser, Debug)]
#[command(name = "licenselock")]
#[command(about = "License key management and piracy detection core")]
struct Cli {
    /// Seed the store with demo data (user, licenses, devices, one alert)
    #[arg(long)]
    seed: bool,

    /// Verify a license key and log its classification
    #[arg(long, value_name = "KEY")]
    verify: Option<String>,
}

const DEMO_EMAIL: &str = "demo@licenselock.local";
const DEMO_PASSWORD: &str = "Demo-Passw0rd!";

/// Seeds the store with demo data for local exploration.
/// Creates: user, two licenses, two devices, and one over-limit alert.
/// Skipped when the demo user already exists.
fn seed_demo_data(services: &Services) {
    let user = match services.auth.register(
        DEMO_EMAIL,
        DEMO_PASSWORD,
        "Demo User",
        "AAAAA-BBBBB-CCCCC-DDDDD",
    ) {
        Ok(user) => user,
        Err(AppError::Conflict(_)) => {
            tracing::info!("Store already has demo data, skipping seed");
            return;
        }
        Err(e) => {
            tracing::error!("Failed to create demo user: {}", e);
            return;
        }
    };

    tracing::info!("============================================");
    tracing::info!("SEEDING DEMO DATA");
    tracing::info!("============================================");

    let workstation = services
        .licenses
        .create(&user.id, "Workstation Suite", 2, None)
        .expect("Failed to create demo license");
    let trial = services
        .licenses
        .create(&user.id, "Trial Edition", 1, Some(licenselock::util::now() + 14 * 86400))
        .expect("Failed to create demo license");

    services
        .devices
        .activate(&workstation.id, "DEMO-HWID-ALPHA", "Office desktop")
        .expect("Failed to activate demo device");
    services
        .devices
        .activate(&workstation.id, "DEMO-HWID-BRAVO", "Laptop")
        .expect("Failed to activate demo device");

    // Third device on a 2-seat license: rejected, leaves a high alert behind.
    if let Err(e) = services
        .devices
        .activate(&workstation.id, "DEMO-HWID-CHARLIE", "Unknown machine")
    {
        tracing::info!("Demo over-limit activation rejected as expected: {}", e);
    }

    tracing::info!("Demo user: {} / {}", DEMO_EMAIL, DEMO_PASSWORD);
    tracing::info!("License '{}': {}", workstation.name, workstation.key);
    tracing::info!("License '{}': {}", trial.name, trial.key);
    tracing::info!("============================================");
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "licenselock=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }

    let pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = pool.get().expect("Failed to get connection");
        init_store(&conn).expect("Failed to initialize store");
    }

    let store = Store::new(SqliteBackend::new(pool));
    let services = Services::new(store, config.audit_log_enabled);

    if cli.seed {
        seed_demo_data(&services);
    }

    if let Some(key) = cli.verify {
        match services.licenses.verify(&key) {
            Ok(validity) => tracing::info!("License key {}: {}", key, validity.as_ref()),
            Err(e) => tracing::error!("Verification failed: {}", e),
        }
    }

    match services.auth.login(DEMO_EMAIL, DEMO_PASSWORD) {
        Ok(user) => match services.usage_stats(&user.id) {
            Ok(stats) => tracing::info!(
                "Demo account: {} activations, {} devices, {} open alerts",
                stats.total_activations,
                stats.active_devices,
                stats.alerts_count
            ),
            Err(e) => tracing::error!("Failed to compute usage stats: {}", e),
        },
        Err(AppError::InvalidCredentials) => {
            tracing::info!("No demo data present; run with --seed to create some")
        }
        Err(e) => tracing::error!("Demo login failed: {}", e),
    }
}
