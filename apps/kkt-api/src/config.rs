//! # API Configuration
//!
//! Configuration for the HTTP façade and the register it drives.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     KKT_PORT=8000                                                      │
//! │     KKT_TRANSPORT=tcp  KKT_TCP_HOST=10.0.0.5                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/kkt-bridge/kkt.toml (Linux)                              │
//! │     ~/Library/Application Support/com.kkt.bridge/kkt.toml (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     simulator driver, 127.0.0.1:8000, 5s busy timeout                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # kkt.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8000
//! request_timeout_secs = 30
//!
//! [device]
//! driver = "simulator"
//! busy_timeout_ms = 5000
//! connect_on_startup = true
//! default_cashier = "Кассир"
//!
//! [device.connection]
//! transport = "serial"
//! port = "/dev/ttyACM0"
//! baudrate = 115200
//!
//! [logging]
//! filter = "info,kkt=debug"
//! format = "text"  # text | json
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use kkt_core::validation::validate_cashier_name;
use kkt_core::DEFAULT_CASHIER;
use kkt_device::ConnectionDescriptor;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Server Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// How long a request waits for its device call before answering 504.
    /// The call itself keeps running on the blocking pool.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// =============================================================================
// Device Settings
// =============================================================================

/// Which `FiscalDriver` backs the session.
///
/// The native vendor binding is linked outside this workspace; the only
/// driver built in is the in-memory simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    #[default]
    Simulator,
}

impl std::fmt::Display for DriverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverKind::Simulator => write!(f, "simulator"),
        }
    }
}

impl std::str::FromStr for DriverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulator" | "sim" => Ok(DriverKind::Simulator),
            other => Err(ConfigError::Invalid(format!(
                "Unknown driver: '{}'. Valid options: simulator",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    #[serde(default)]
    pub driver: DriverKind,

    #[serde(default)]
    pub connection: ConnectionDescriptor,

    /// Bounded wait for the device lock before `DeviceBusy`.
    #[serde(default = "default_busy_timeout")]
    pub busy_timeout_ms: u64,

    #[serde(default)]
    pub connect_on_startup: bool,

    /// Operator name used when a request omits `cashier`.
    #[serde(default = "default_cashier")]
    pub default_cashier: String,
}

fn default_busy_timeout() -> u64 {
    kkt_device::DEFAULT_BUSY_TIMEOUT.as_millis() as u64
}

fn default_cashier() -> String {
    DEFAULT_CASHIER.to_string()
}

impl Default for DeviceSettings {
    fn default() -> Self {
        DeviceSettings {
            driver: DriverKind::default(),
            connection: ConnectionDescriptor::default(),
            busy_timeout_ms: default_busy_timeout(),
            connect_on_startup: false,
            default_cashier: default_cashier(),
        }
    }
}

impl DeviceSettings {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Invalid(format!(
                "Unknown log format: '{}'. Valid options: text, json",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` still wins.
    #[serde(default = "default_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_filter() -> String {
    "info,kkt=debug,tower_http=info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
            format: LogFormat::default(),
        }
    }
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Complete configuration of the façade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ApiConfig {
    /// Loads configuration: defaults, then the TOML file, then `KKT_*`
    /// environment variables, then validation.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document and validates it. No environment overrides.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        let config: ApiConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr is empty".into()));
        }

        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "server.request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.device.busy_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "device.busy_timeout_ms must be greater than 0".into(),
            ));
        }

        self.device
            .connection
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("device.connection: {}", e)))?;

        validate_cashier_name(&self.device.default_cashier)
            .map_err(|e| ConfigError::Invalid(format!("device.default_cashier: {}", e)))?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        if let Ok(addr) = std::env::var("KKT_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Ok(port) = std::env::var("KKT_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding port from environment");
                self.server.port = p;
            }
        }

        if let Ok(secs) = std::env::var("KKT_REQUEST_TIMEOUT_SECS") {
            if let Ok(s) = secs.parse::<u64>() {
                self.server.request_timeout_secs = s;
            }
        }

        if let Ok(driver) = std::env::var("KKT_DRIVER") {
            self.device.driver = driver.parse()?;
        }

        if let Ok(ms) = std::env::var("KKT_BUSY_TIMEOUT_MS") {
            if let Ok(m) = ms.parse::<u64>() {
                self.device.busy_timeout_ms = m;
            }
        }

        if let Ok(flag) = std::env::var("KKT_CONNECT_ON_STARTUP") {
            self.device.connect_on_startup = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        if let Ok(cashier) = std::env::var("KKT_DEFAULT_CASHIER") {
            self.device.default_cashier = cashier;
        }

        if let Ok(transport) = std::env::var("KKT_TRANSPORT") {
            debug!(transport = %transport, "Overriding connection from environment");
            self.device.connection = connection_from_env(&transport)?;
        }

        if let Ok(filter) = std::env::var("KKT_LOG_FILTER") {
            self.logging.filter = filter;
        }

        if let Ok(format) = std::env::var("KKT_LOG_FORMAT") {
            self.logging.format = format.parse()?;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "kkt", "bridge")
            .map(|dirs| dirs.config_dir().join("kkt.toml"))
    }
}

fn connection_from_env(transport: &str) -> ConfigResult<ConnectionDescriptor> {
    let var = |name: &str| std::env::var(name).unwrap_or_default();

    let descriptor = match transport.to_lowercase().as_str() {
        "usb" => ConnectionDescriptor::Usb,
        "serial" => ConnectionDescriptor::Serial {
            port: var("KKT_SERIAL_PORT"),
            baudrate: var("KKT_SERIAL_BAUDRATE")
                .parse()
                .unwrap_or(kkt_device::connection::DEFAULT_BAUDRATE),
        },
        "tcp" => ConnectionDescriptor::Tcp {
            host: var("KKT_TCP_HOST"),
            port: var("KKT_TCP_PORT")
                .parse()
                .unwrap_or(kkt_device::connection::DEFAULT_TCP_PORT),
        },
        "bluetooth" => ConnectionDescriptor::Bluetooth {
            address: var("KKT_BLUETOOTH_ADDRESS"),
        },
        other => {
            return Err(ConfigError::Invalid(format!(
                "Unknown transport: '{}'. Valid options: usb, serial, tcp, bluetooth",
                other
            )))
        }
    };
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.driver, DriverKind::Simulator);
        assert_eq!(config.server.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.device.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = ApiConfig::from_toml(
            r#"
            [server]
            port = 9100

            [device.connection]
            transport = "serial"
            port = "/dev/ttyACM0"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert_eq!(
            config.device.connection,
            ConnectionDescriptor::Serial {
                port: "/dev/ttyACM0".to_string(),
                baudrate: 115_200,
            }
        );
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_invalid_connection_rejected() {
        let err = ApiConfig::from_toml(
            r#"
            [device.connection]
            transport = "tcp"
            host = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut config = ApiConfig::default();
        config.server.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ApiConfig::default();
        config.device.busy_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!("SIM".parse::<DriverKind>().unwrap(), DriverKind::Simulator);
        assert!("atol10".parse::<DriverKind>().is_err());
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
    }
}
