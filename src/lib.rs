//! FlowViz
//!
//! Este crate actúa como la fachada del servidor FlowViz:
//! - Expone `cli` con los comandos y flags del binario.
//! - Expone `config` para la dirección de escucha desde el entorno.
//! - Expone `server` con la composición proyecto → registro → API.
//!
//! Puede usarse desde `main.rs` o desde los tests de integración.

pub mod cli;
pub mod config;
pub mod errors;
pub mod server;

pub use cli::{Cli, Command, RunArgs};
pub use config::ServerConfig;
pub use errors::ServeError;
