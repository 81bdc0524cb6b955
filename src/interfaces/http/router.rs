//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::users::{
    CountUsersQuery, CountsResponse, FilterOptions, ListUsersQuery, PaginationCountOptions,
    PaginationOptions, RoleView, SetRolesInput, SortOptions, UserInput, UserResponse,
};
use crate::application::UserService;
use crate::infrastructure::database::repositories::UserRepository;

use super::common::ApiResponse;
use super::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::users::{self, UserHandlerState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Users
        users::list_users,
        users::count_users,
        users::get_user,
        users::set_user_roles,
        users::create_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Common
            ApiResponse<UserResponse>,
            ApiResponse<CountsResponse>,
            ApiResponse<bool>,
            // Health
            HealthResponse,
            ComponentHealth,
            // Users
            FilterOptions,
            SortOptions,
            PaginationOptions,
            PaginationCountOptions,
            ListUsersQuery,
            CountUsersQuery,
            SetRolesInput,
            UserInput,
            RoleView,
            UserResponse,
            CountsResponse,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Users", description = "User directory: listing, counting, CRUD and role assignment"),
    ),
    info(
        title = "User Directory API",
        version = "1.0.0",
        description = "REST API for managing users and their roles",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(db: DatabaseConnection, prometheus_handle: PrometheusHandle) -> Router {
    let user_state = UserHandlerState {
        user_service: Arc::new(UserService::new(Arc::new(UserRepository::new(db.clone())))),
    };

    let user_routes = Router::new()
        .route("/", post(users::create_user))
        .route("/all", post(users::list_users))
        .route("/count", post(users::count_users))
        .route(
            "/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{user_id}/roles", put(users::set_user_roles))
        .with_state(user_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health + metrics
        .merge(health_routes)
        .merge(metrics_routes)
        // Users
        .nest("/api/v1/users", user_routes)
        // Middleware
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
