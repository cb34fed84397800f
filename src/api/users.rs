use actix_web::{web, HttpResponse, Responder, ResponseError};

use crate::{
    models::{UserDocument, UserFields},
    services::{UpdateStatus, UserService},
    utils::ApiError,
};

/// Loga o erro com o nome da operação e converte em resposta.
/// O corpo nunca carrega detalhes internos.
fn failure(operation: &str, err: ApiError) -> HttpResponse {
    match &err {
        ApiError::NotFound(id) => log::info!("🔍 {}: user {} not found", operation, id),
        ApiError::MalformedInput(msg) => log::warn!("⚠️  {}: {}", operation, msg),
        _ => log::error!("❌ Error {}: {}", operation, err),
    }
    err.error_response()
}

fn text(mut builder: actix_web::HttpResponseBuilder, message: &'static str) -> HttpResponse {
    builder.content_type("text/plain; charset=utf-8").body(message)
}

/// GET /users - Lista todos os usuários na ordem natural do banco
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<UserDocument>),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn list_users(service: web::Data<UserService>) -> impl Responder {
    match service.list_users().await {
        Ok(users) => {
            log::debug!("📋 Listed {} users", users.len());
            HttpResponse::Ok().json(users)
        }
        Err(e) => failure("fetching user data", e),
    }
}

/// POST /users - Cria usuário com os campos enviados
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UserFields,
    responses(
        (status = 201, description = "User created", body = UserDocument),
        (status = 400, description = "Malformed JSON body", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn create_user(service: web::Data<UserService>, body: web::Json<UserFields>) -> impl Responder {
    match service.create_user(body.into_inner()).await {
        Ok(user) => {
            log::info!("✅ User created: {}", user.id().unwrap_or_default());
            HttpResponse::Created().json(user)
        }
        Err(e) => failure("creating user", e),
    }
}

/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User found", body = UserDocument),
        (status = 400, description = "Invalid id (strict policy)", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure", body = String, content_type = "text/plain")
    )
)]
pub async fn get_user(service: web::Data<UserService>, id: web::Path<String>) -> impl Responder {
    match service.get_user(&id).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => failure("fetching user", e),
    }
}

/// PUT /users/{id} - Merge dos campos enviados (`$set`), não substitui o documento
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    request_body = UserFields,
    responses(
        (status = 200, description = "User updated", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed body, or invalid id (strict policy)", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found, or nothing modified (legacy policy)", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure, or invalid id (legacy policy)", body = String, content_type = "text/plain")
    )
)]
pub async fn update_user(
    service: web::Data<UserService>,
    id: web::Path<String>,
    body: web::Json<UserFields>,
) -> impl Responder {
    match service.update_user(&id, body.into_inner()).await {
        Ok(UpdateStatus::Updated) => {
            log::info!("✅ User updated: {}", id);
            text(HttpResponse::Ok(), "User updated successfully")
        }
        Ok(UpdateStatus::Unchanged) => text(HttpResponse::Ok(), "User unchanged"),
        Err(e) => failure("updating user", e),
    }
}

/// DELETE /users/{id}
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User deleted", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid id (strict policy)", body = String, content_type = "text/plain"),
        (status = 404, description = "User not found", body = String, content_type = "text/plain"),
        (status = 500, description = "Store failure, or invalid id (legacy policy)", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_user(service: web::Data<UserService>, id: web::Path<String>) -> impl Responder {
    match service.delete_user(&id).await {
        Ok(()) => {
            log::info!("🗑️  User deleted: {}", id);
            text(HttpResponse::Ok(), "User deleted successfully")
        }
        Err(e) => failure("deleting user", e),
    }
}
