use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users Service API",
        version = "1.0.0",
        description = "CRUD over a single MongoDB collection of free-form user documents.\n\n**Identifiers:** `_id` is assigned by the store and rendered as a 24-char hex string.\n\n**Status policy:** with `STATUS_POLICY=legacy` (default) an invalid id yields 404 on GET and 500 on PUT/DELETE, and a PUT that modifies nothing yields 404. With `STATUS_POLICY=strict` an invalid id yields 400 everywhere and a PUT that modifies nothing yields 200."
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::UserFields,
            crate::models::UserDocument,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Users", description = "Create, read, merge-update and delete user documents."),
        (name = "Health", description = "Service and MongoDB connectivity status."),
    )
)]
pub struct ApiDoc;
