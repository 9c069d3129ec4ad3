//! # Connection Descriptor
//!
//! How to reach the register: transport kind plus endpoint parameters.
//!
//! ```text
//! ┌──────────────┬───────────────────────────────┬────────────────────────┐
//! │ Transport    │ Parameters                    │ Defaults               │
//! ├──────────────┼───────────────────────────────┼────────────────────────┤
//! │ usb          │ (none)                        │                        │
//! │ serial       │ port, baudrate                │ baudrate 115200        │
//! │ tcp          │ host, port                    │ port 5555              │
//! │ bluetooth    │ address                       │                        │
//! └──────────────┴───────────────────────────────┴────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DeviceError, DeviceResult};

pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_TCP_PORT: u16 = 5555;

fn default_baudrate() -> u32 {
    DEFAULT_BAUDRATE
}

fn default_tcp_port() -> u16 {
    DEFAULT_TCP_PORT
}

/// Transport kind as the driver encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Usb,
    Serial,
    Tcp,
    Bluetooth,
}

impl TransportKind {
    pub const fn code(&self) -> i64 {
        match self {
            TransportKind::Usb => 0,
            TransportKind::Serial => 1,
            TransportKind::Tcp => 2,
            TransportKind::Bluetooth => 3,
        }
    }
}

/// Where the register is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "lowercase")]
pub enum ConnectionDescriptor {
    Usb,
    Serial {
        port: String,
        #[serde(default = "default_baudrate")]
        baudrate: u32,
    },
    Tcp {
        host: String,
        #[serde(default = "default_tcp_port")]
        port: u16,
    },
    Bluetooth {
        address: String,
    },
}

impl Default for ConnectionDescriptor {
    fn default() -> Self {
        ConnectionDescriptor::Tcp {
            host: "localhost".to_string(),
            port: DEFAULT_TCP_PORT,
        }
    }
}

impl ConnectionDescriptor {
    pub fn kind(&self) -> TransportKind {
        match self {
            ConnectionDescriptor::Usb => TransportKind::Usb,
            ConnectionDescriptor::Serial { .. } => TransportKind::Serial,
            ConnectionDescriptor::Tcp { .. } => TransportKind::Tcp,
            ConnectionDescriptor::Bluetooth { .. } => TransportKind::Bluetooth,
        }
    }

    /// Rejects descriptors the driver could never open.
    pub fn validate(&self) -> DeviceResult<()> {
        match self {
            ConnectionDescriptor::Usb => Ok(()),
            ConnectionDescriptor::Serial { port, baudrate } => {
                if port.trim().is_empty() {
                    return Err(DeviceError::connection("serial port is not set"));
                }
                if *baudrate == 0 {
                    return Err(DeviceError::connection("baud rate must be positive"));
                }
                Ok(())
            }
            ConnectionDescriptor::Tcp { host, port } => {
                if host.trim().is_empty() {
                    return Err(DeviceError::connection("TCP host is not set"));
                }
                if *port == 0 {
                    return Err(DeviceError::connection("TCP port must be non-zero"));
                }
                Ok(())
            }
            ConnectionDescriptor::Bluetooth { address } => {
                if address.trim().is_empty() {
                    return Err(DeviceError::connection("bluetooth address is not set"));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionDescriptor::Usb => write!(f, "usb"),
            ConnectionDescriptor::Serial { port, baudrate } => {
                write!(f, "serial {} @ {}", port, baudrate)
            }
            ConnectionDescriptor::Tcp { host, port } => write!(f, "tcp {}:{}", host, port),
            ConnectionDescriptor::Bluetooth { address } => write!(f, "bluetooth {}", address),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let d: ConnectionDescriptor =
            serde_json::from_str(r#"{"transport": "serial", "port": "/dev/ttyACM0"}"#).unwrap();
        assert_eq!(
            d,
            ConnectionDescriptor::Serial {
                port: "/dev/ttyACM0".to_string(),
                baudrate: DEFAULT_BAUDRATE
            }
        );

        let d: ConnectionDescriptor =
            serde_json::from_str(r#"{"transport": "tcp", "host": "10.0.0.5"}"#).unwrap();
        assert_eq!(d.to_string(), "tcp 10.0.0.5:5555");
        assert_eq!(d.kind().code(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(ConnectionDescriptor::Usb.validate().is_ok());
        assert!(ConnectionDescriptor::default().validate().is_ok());

        let empty_port = ConnectionDescriptor::Serial {
            port: " ".to_string(),
            baudrate: DEFAULT_BAUDRATE,
        };
        assert!(matches!(empty_port.validate(), Err(DeviceError::Connection { .. })));

        let zero_port = ConnectionDescriptor::Tcp {
            host: "localhost".to_string(),
            port: 0,
        };
        assert!(zero_port.validate().is_err());
    }
}
