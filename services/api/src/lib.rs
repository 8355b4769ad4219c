mod assess;
mod cli;
mod infra;
mod routes;
mod server;

use radar_smr::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
