mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use oficina_vital::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
