//! Interfaz de línea de comandos del binario `flowviz`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "flowviz", version, about = "Servidor de visualización de pipelines de datos")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingiere el proyecto y levanta la API HTTP.
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Host de escucha; por defecto el de `VIZ_HOST`.
    #[arg(long)]
    pub host: Option<String>,

    /// Puerto de escucha; por defecto el de `VIZ_PORT`.
    #[arg(long)]
    pub port: Option<u16>,

    /// Restringe la ingesta a un único pipeline registrado.
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Entorno cuyos ficheros se superponen a los de la raíz del proyecto.
    #[arg(long)]
    pub env: Option<String>,

    /// Sobrescrituras de parámetros `clave=valor` separadas por comas.
    #[arg(long)]
    pub params: Option<String>,

    /// Reconstruye el grafo cuando cambian los ficheros del proyecto.
    #[arg(long)]
    pub autoreload: bool,

    /// Sirve un documento principal guardado en lugar de ingerir.
    #[arg(long, value_name = "FICHERO")]
    pub load_file: Option<PathBuf>,

    /// Escribe el documento principal a disco tras la ingesta.
    #[arg(long, value_name = "FICHERO")]
    pub save_file: Option<PathBuf>,

    /// Directorio del proyecto.
    #[arg(long, default_value = ".")]
    pub project: PathBuf,
}
