use std::env;
use std::fmt;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;

use crate::scoring::{ScoringConfig, ScoringConfigError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: load_scoring()?,
        })
    }
}

fn load_scoring() -> Result<ScoringConfig, ConfigError> {
    let mut scoring = match env::var_os("SCORING_RULES_PATH") {
        Some(path) => read_rules(Path::new(&path))?,
        None => ScoringConfig::default(),
    };

    if let Some(threshold) = decimal_var("SCORING_LARGE_LOAN_THRESHOLD")? {
        scoring.large_loan.threshold = threshold;
    }
    if let Some(amount) = decimal_var("SCORING_DEFAULT_LOAN_AMOUNT")? {
        scoring.default_requested_loan_amount = amount;
    }

    scoring.validate().map_err(ConfigError::InvalidRules)?;
    Ok(scoring)
}

/// Parse a JSON rules file; omitted sections keep their reference values.
pub fn read_rules(path: &Path) -> Result<ScoringConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::RulesFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::RulesFormat {
        path: path.to_path_buf(),
        source,
    })
}

fn decimal_var(variable: &'static str) -> Result<Option<Decimal>, ConfigError> {
    match env::var(variable) {
        Ok(value) => value
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidDecimal { variable, value }),
        Err(_) => Ok(None),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidDecimal {
        variable: &'static str,
        value: String,
    },
    RulesFile {
        path: PathBuf,
        source: std::io::Error,
    },
    RulesFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidRules(ScoringConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidDecimal { variable, value } => {
                write!(f, "{variable} must be a decimal amount, got '{value}'")
            }
            ConfigError::RulesFile { path, .. } => {
                write!(f, "unable to read scoring rules from {}", path.display())
            }
            ConfigError::RulesFormat { path, source } => {
                write!(f, "scoring rules in {} are malformed: {source}", path.display())
            }
            ConfigError::InvalidRules(err) => write!(f, "scoring rules rejected: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidDecimal { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RulesFile { source, .. } => Some(source),
            ConfigError::RulesFormat { source, .. } => Some(source),
            ConfigError::InvalidRules(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for variable in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SCORING_RULES_PATH",
            "SCORING_LARGE_LOAN_THRESHOLD",
            "SCORING_DEFAULT_LOAN_AMOUNT",
        ] {
            env::remove_var(variable);
        }
    }

    fn rules_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("payslip-credit-{}-{name}.json", std::process::id()));
        fs::write(&path, contents).expect("write rules file");
        path
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn scoring_overrides_apply_on_top_of_defaults() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("SCORING_LARGE_LOAN_THRESHOLD", "250000");
        env::set_var("SCORING_DEFAULT_LOAN_AMOUNT", " 75000.50 ");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.scoring.large_loan.threshold, dec!(250000));
        assert_eq!(config.scoring.default_requested_loan_amount, dec!(75000.50));
        reset_env();
    }

    #[test]
    fn rejects_malformed_decimal_override() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_LARGE_LOAN_THRESHOLD", "a lot");
        let err = AppConfig::load().expect_err("threshold rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidDecimal {
                variable: "SCORING_LARGE_LOAN_THRESHOLD",
                ..
            }
        ));
        reset_env();
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_LARGE_LOAN_THRESHOLD", "0");
        let err = AppConfig::load().expect_err("threshold rejected");
        assert!(matches!(err, ConfigError::InvalidRules(_)));
        reset_env();
    }

    #[test]
    fn reads_rules_file() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let path = rules_file(
            "amortized",
            r#"{
                "large_loan": {
                    "payment_policy": { "kind": "amortized", "annual_rate": "0.06", "term_months": 360 }
                },
                "red_flags": { "garnishment_cap": 25 }
            }"#,
        );
        env::set_var("SCORING_RULES_PATH", &path);

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.scoring.red_flags.garnishment_cap, 25);
        assert_eq!(config.scoring.red_flags.debt_ratio_cap, 40);
        assert_eq!(
            config.scoring.large_loan.payment_policy,
            crate::scoring::PaymentPolicy::Amortized {
                annual_rate: dec!(0.06),
                term_months: 360,
            }
        );

        fs::remove_file(path).ok();
        reset_env();
    }

    #[test]
    fn reports_missing_and_malformed_rules_files() {
        let missing = read_rules(Path::new("/definitely/not/here/rules.json"))
            .expect_err("missing file rejected");
        assert!(matches!(missing, ConfigError::RulesFile { .. }));

        let path = rules_file("broken", "{ \"income\": ");
        let malformed = read_rules(&path).expect_err("malformed file rejected");
        assert!(matches!(malformed, ConfigError::RulesFormat { .. }));
        fs::remove_file(path).ok();
    }
}
