use std::env;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

use tracing::warn;

pub const DEFAULT_GBT_MODEL_PATH: &str = "models/risk_prediction_gbt.json";
pub const DEFAULT_NN_MODEL_PATH: &str = "models/risk_prediction_nn.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gbt_model_path: String,
    pub nn_model_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            host: env::var("HOST")
                .unwrap_or_else(|_| {
                    warn!("HOST not set, using default");
                    "0.0.0.0".to_string()
                }),
            port: env::var("PORT")
                .ok()
                .and_then(|port| match port.parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("PORT is not a valid port number: {}", port);
                        None
                    }
                })
                .unwrap_or_else(|| {
                    warn!("PORT not usable, using default");
                    3000
                }),
            gbt_model_path: env::var("RISK_GBT_MODEL_PATH")
                .unwrap_or_else(|_| {
                    warn!("RISK_GBT_MODEL_PATH not set, using default");
                    DEFAULT_GBT_MODEL_PATH.to_string()
                }),
            nn_model_path: env::var("RISK_NN_MODEL_PATH")
                .unwrap_or_else(|_| {
                    warn!("RISK_NN_MODEL_PATH not set, using default");
                    DEFAULT_NN_MODEL_PATH.to_string()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - model artifacts not found");
        }

        config
    }

    /// Both model artifacts exist on disk.
    pub fn is_configured(&self) -> bool {
        Path::new(&self.gbt_model_path).is_file() && Path::new(&self.nn_model_path).is_file()
    }

    /// Resolves `host` (IP literal or hostname) to the first usable listen address.
    pub fn server_addr(&self) -> io::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("HOST {} resolved to no addresses", self.host),
                )
            })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            gbt_model_path: DEFAULT_GBT_MODEL_PATH.to_string(),
            nn_model_path: DEFAULT_NN_MODEL_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_addr() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..AppConfig::default()
        };

        assert_eq!(config.server_addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_ipv6_literal_host() {
        let config = AppConfig {
            host: "::1".to_string(),
            port: 8080,
            ..AppConfig::default()
        };

        assert_eq!(config.server_addr().unwrap().to_string(), "[::1]:8080");
    }

    #[test]
    fn test_hostname_host_is_resolved() {
        let config = AppConfig {
            host: "localhost".to_string(),
            port: 8080,
            ..AppConfig::default()
        };

        let addr = config.server_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };

        assert!(config.server_addr().is_err());
    }

    #[test]
    fn test_missing_models_not_configured() {
        let config = AppConfig {
            gbt_model_path: "/nonexistent/gbt.json".to_string(),
            nn_model_path: "/nonexistent/nn.json".to_string(),
            ..AppConfig::default()
        };

        assert!(!config.is_configured());
    }
}
