// Biblioteca raíz del crate `planmalla`.
// Reexporta los módulos del motor curricular y el servidor HTTP.
pub mod api_json;
pub mod curriculum;
pub mod datos;
pub mod models;
pub mod server;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
