mod api;
mod config;
mod database;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{Compress, Logger},
    web, App, HttpServer,
};
use dotenv::dotenv;
use std::io;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::database::{ConnectionManager, MongoUserStore, UserStore};
use crate::services::UserService;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    log::info!("🚀 Starting Users Service...");
    log::info!(
        "📊 Database: {} ({}.{})",
        config.mongo.uri,
        config.mongo.database,
        config.mongo.collection
    );
    log::info!("⚖️  Status policy: {:?}", config.status_policy);

    // Abre a conexão antes de aceitar tráfego; se falhar, as requisições tentam de novo
    let connections = ConnectionManager::new(config.mongo.clone());
    if let Err(e) = connections.acquire_collection().await {
        log::warn!("⚠️  MongoDB not reachable at startup, will retry per request: {}", e);
    }

    let store: Arc<dyn UserStore> = Arc::new(MongoUserStore::new(connections));
    let service = web::Data::new(UserService::new(store, config.status_policy));
    let cors_origins = config.cors_allowed_origins.clone();
    let bind_address = config.bind_address();

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);

    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| {
                if origin == "*" {
                    cors.allow_any_origin()
                } else {
                    cors.allowed_origin(origin)
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers(vec![header::CONTENT_TYPE])
            .max_age(3600);

        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(service.clone())
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind(bind_address)?
    .run()
    .await
}
