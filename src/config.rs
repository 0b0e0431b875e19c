use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub audit_log_enabled: bool,
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("LICENSELOCK_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let audit_log_enabled = env::var("AUDIT_LOG_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self {
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "licenselock.db".to_string()),
            audit_log_enabled,
            dev_mode,
        }
    }
}
