use actix_web::{middleware::Logger, App, HttpServer};
use log::{error, info};

use projectforge::app::{cors, AppState};
use projectforge::config::Config;
use projectforge::store::PgStore;
use projectforge::AppError;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()
        .map_err(|e| AppError::Config(e.to_string()))
        .map_err(startup_error)?;

    let store = PgStore::connect(&config).await.map_err(startup_error)?;
    store.migrate().await.map_err(startup_error)?;

    let state = AppState::new(&config, store.clone());
    let origins = config.cors_origins.clone();

    info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&origins))
            .configure(|cfg| state.configure(cfg))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await?;

    store.close().await;
    Ok(())
}

fn startup_error(e: AppError) -> std::io::Error {
    error!("Startup failed: {}", e);
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}
