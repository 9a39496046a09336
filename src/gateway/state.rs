use std::sync::Arc;

use crate::auth::service::AuthService;
use crate::content::ContentStore;
use crate::db::Database;
use crate::payment::gateway::PaymentGateway;

/// Shared application state for all handlers.
pub struct AppState {
    /// PostgreSQL connection pool wrapper
    pub db: Arc<Database>,
    /// Session auth (argon2 + JWT)
    pub auth: Arc<AuthService>,
    /// Payment gateway client (real or mock)
    pub payment_gateway: Arc<dyn PaymentGateway>,
    /// Public gateway key handed to checkout clients
    pub gateway_key_id: String,
    /// Shared secret for callback signature verification
    pub gateway_secret: String,
    /// Currency for order creation (minor units on the wire)
    pub currency: String,
    /// Thumbnail/video file store
    pub content: ContentStore,
}

impl AppState {
    pub fn pool(&self) -> &sqlx::PgPool {
        self.db.pool()
    }
}
