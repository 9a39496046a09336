//! HTTP gateway: router assembly and server startup.

pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::jwt_auth_middleware;
use state::AppState;
use types::ApiResponse;

/// Liveness probe
///
/// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses((status = 200, description = "Service is up")),
    tag = "Health"
)]
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<ApiResponse<serde_json::Value>> {
    let db_ok = state.db.health_check().await.is_ok();
    Json(ApiResponse::success(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
    })))
}

pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) {
    let auth_routes = Router::new()
        .route("/register", post(crate::auth::handlers::register))
        .route("/login", post(crate::auth::handlers::login))
        .route(
            "/me",
            get(crate::auth::handlers::me).route_layer(from_fn_with_state(
                state.clone(),
                jwt_auth_middleware,
            )),
        );

    // Student surface: enrolled courses, content, progress, stats.
    let my_routes = Router::new()
        .route("/courses", get(crate::catalog::handlers::list_enrolled))
        .route(
            "/courses/{course_id}",
            get(crate::catalog::handlers::course_content),
        )
        .route("/enroll", post(crate::enrollment::handlers::enroll))
        .route(
            "/progress",
            post(crate::enrollment::handlers::update_progress),
        )
        .route("/stats", get(crate::catalog::handlers::my_stats))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let payment_routes = Router::new()
        .route(
            "/create-order",
            post(crate::payment::handlers::create_order),
        )
        .route(
            "/verify-payment",
            post(crate::payment::handlers::verify_payment),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let instructor_routes = Router::new()
        .route(
            "/courses",
            post(crate::instructor::handlers::create_course)
                .get(crate::instructor::handlers::list_courses),
        )
        .route(
            "/courses/{course_id}",
            get(crate::instructor::handlers::get_course)
                .put(crate::instructor::handlers::update_course)
                .delete(crate::instructor::handlers::delete_course),
        )
        .route(
            "/courses/{course_id}/lessons",
            post(crate::instructor::handlers::add_lesson),
        )
        .route(
            "/courses/{course_id}/status",
            patch(crate::instructor::handlers::update_status),
        )
        .route("/stats", get(crate::instructor::handlers::dashboard_stats))
        .route(
            "/enrollments",
            get(crate::instructor::handlers::list_enrollments),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let admin_routes = Router::new()
        .route("/stats", get(crate::admin::handlers::platform_stats))
        .route("/users", get(crate::admin::handlers::list_users))
        .route(
            "/users/{user_id}",
            get(crate::admin::handlers::get_user)
                .put(crate::admin::handlers::update_user)
                .delete(crate::admin::handlers::delete_user),
        )
        .route("/courses", get(crate::admin::handlers::list_courses))
        .route(
            "/courses/{course_id}",
            get(crate::admin::handlers::get_course)
                .put(crate::admin::handlers::update_course)
                .delete(crate::admin::handlers::delete_course),
        )
        .route("/payments", get(crate::admin::handlers::list_payments))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let app = Router::new()
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/courses", get(crate::catalog::handlers::list_available))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/my", my_routes)
        .nest("/api/v1/payments", payment_routes)
        .nest("/api/v1/instructor", instructor_routes)
        .nest("/api/v1/admin", admin_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("📖 API Docs: http://{}/docs", addr);
    println!("📂 Public API:  /api/v1/courses");
    println!("🔒 Private API: /api/v1/my/*, /api/v1/payments/* (auth required)");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
