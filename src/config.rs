//! Carga de configuración del servidor desde variables de entorno.
//! Usa convención `VIZ_HOST` / `VIZ_PORT` con valores por defecto locales.

use std::env;
use std::net::{SocketAddr, ToSocketAddrs};

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::errors::ServeError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 4141;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        // asegura que .env se haya cargado
        Lazy::force(&DOTENV_LOADED);
        let host = env::var("VIZ_HOST")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = env::var("VIZ_PORT").ok().and_then(|value| value.parse().ok()).unwrap_or(DEFAULT_PORT);
        Self { host, port }
    }

    /// Dirección de escucha final: los flags de la CLI pisan al entorno.
    pub fn listen_addr(&self, host: Option<&str>, port: Option<u16>) -> Result<SocketAddr, ServeError> {
        let host = host.unwrap_or(&self.host);
        let port = port.unwrap_or(self.port);
        let candidate = format!("{host}:{port}");
        candidate
            .to_socket_addrs()
            .ok()
            .and_then(|mut resolved| resolved.next())
            .ok_or(ServeError::Address(candidate))
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_take_precedence_over_the_config() {
        let config = ServerConfig { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT };
        let addr = config.listen_addr(Some("0.0.0.0"), Some(8080)).unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:8080");

        let addr = config.listen_addr(None, None).unwrap();
        assert_eq!(addr.to_string(), "127.0.0.1:4141");
    }

    #[test]
    fn hostnames_resolve_and_garbage_does_not() {
        let config = ServerConfig { host: "localhost".to_string(), port: 4141 };
        assert!(config.listen_addr(None, None).is_ok());

        let err = config.listen_addr(Some("no existe esto"), None).unwrap_err();
        assert!(err.to_string().contains("no existe esto"));
    }
}
