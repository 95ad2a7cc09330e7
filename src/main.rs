// --- Orientador de Plan de Estudios - Archivo principal ---

use planmalla::run_server;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    println!("=== Orientador de Plan de Estudios (API) ===");
    let bind = "127.0.0.1:8080";
    println!("Iniciando servidor en http://{}", bind);
    run_server(bind).await
}
