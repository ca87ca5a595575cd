mod cli;
mod infra;
mod routes;
mod server;
mod submissions;

use wellness_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
