use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info};

use ems::config::AppConfig;
use ems::errors::AppError;
use ems::handlers::{self, AppState};
use ems::utils::clock::SystemClock;
use ems::db;

fn io_error(err: AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = AppConfig::from_env().map_err(|err| {
        error!("Invalid configuration: {}", err);
        io_error(err)
    })?;
    let slot = db::open_slot(&config).map_err(io_error)?;

    let bind_addr = config.bind_addr.clone();
    let state = web::Data::new(AppState::new(slot, Arc::new(SystemClock), config));

    info!("Starting server at {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
