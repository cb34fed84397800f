pub mod health;
pub mod swagger;
pub mod users;

use actix_web::{web, HttpResponse, Responder};

use crate::utils::ApiError;

/// Rotas da API. Compartilhado entre o `main` e os testes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        log::warn!("⚠️  Rejected request body: {}", err);
        ApiError::MalformedInput("Malformed JSON body".to_string()).into()
    });

    cfg.app_data(json_config)
        .route("/", web::get().to(welcome))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/users")
                .route("", web::get().to(users::list_users))
                .route("", web::post().to(users::create_user))
                .route("/{id}", web::get().to(users::get_user))
                .route("/{id}", web::put().to(users::update_user))
                .route("/{id}", web::delete().to(users::delete_user)),
        );
}

pub async fn welcome() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Welcome to the home page!")
}
