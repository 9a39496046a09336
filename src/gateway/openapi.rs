//! OpenAPI / Swagger UI documentation.
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::models::UserProfile;
use crate::auth::service::{AuthResponse, LoginRequest, RegisterRequest};
use crate::catalog::handlers::{CourseContent, EnrolledCourse};
use crate::catalog::models::{Course, CourseStatus, CourseSummary, Lesson};
use crate::enrollment::handlers::{EnrollRequest, ProgressUpdateRequest};
use crate::enrollment::writer::ProgressSnapshot;
use crate::payment::handlers::{CreateOrderRequest, VerifyPaymentResponse};
use crate::payment::order::CreateOrderResponse;
use crate::payment::verify::VerifyPaymentRequest;
use crate::stats::{AdminStats, InstructorStats, StudentStats};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_jwt",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CourseDeck API",
        version = "1.0.0",
        description = "Course marketplace backend: catalog, checkout, enrollment and dashboards."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::health_check,
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::me,
        crate::catalog::handlers::list_available,
        crate::catalog::handlers::list_enrolled,
        crate::catalog::handlers::course_content,
        crate::catalog::handlers::my_stats,
        crate::enrollment::handlers::enroll,
        crate::enrollment::handlers::update_progress,
        crate::payment::handlers::create_order,
        crate::payment::handlers::verify_payment,
        crate::instructor::handlers::dashboard_stats,
        crate::admin::handlers::platform_stats,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserProfile,
            Course,
            CourseSummary,
            CourseStatus,
            Lesson,
            EnrolledCourse,
            CourseContent,
            EnrollRequest,
            ProgressUpdateRequest,
            ProgressSnapshot,
            CreateOrderRequest,
            CreateOrderResponse,
            VerifyPaymentRequest,
            VerifyPaymentResponse,
            InstructorStats,
            AdminStats,
            StudentStats,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Registration, login, session"),
        (name = "Catalog", description = "Course browsing and enrolled content"),
        (name = "Progress", description = "Lesson completion tracking"),
        (name = "Payments", description = "Checkout and verification"),
        (name = "Instructor", description = "Course management and dashboards"),
        (name = "Admin", description = "Platform administration"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generates() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("/api/v1/auth/login"));
        assert!(json.contains("/api/v1/payments/verify-payment"));
    }
}
