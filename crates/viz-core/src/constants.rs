//! Constantes compartidas del grafo: nombres reservados e identificadores sintéticos.

/// Pipeline registrado que se selecciona por defecto cuando existe.
pub const DEFAULT_REGISTERED_PIPELINE_ID: &str = "__default__";

/// Identificador del modular pipeline raíz sintético del árbol.
pub const ROOT_MODULAR_PIPELINE_ID: &str = "__root__";

/// Nombre del nodo que agrupa el diccionario de parámetros completo.
pub const ALL_PARAMETERS_NODE_NAME: &str = "parameters";

/// Prefijo de los nodos de parámetro individuales (`params:<ruta>`).
pub const PARAMS_PREFIX: &str = "params:";

/// Separador entre el nombre base de un dataset y su variante de transcodificación.
pub const TRANSCODING_SEPARATOR: char = '@';

/// `run_id` provisional; nunca sobrevive a la finalización de un `RunStatus`.
pub const DEFAULT_RUN_ID: &str = "default-run-id";
