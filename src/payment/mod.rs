//! Payment flow: gateway client, order creation, callback verification.

pub mod gateway;
pub mod handlers;
pub mod models;
pub mod order;
pub mod verify;

pub use gateway::{GatewayOrder, MockGateway, PaymentGateway, RazorpayClient};
pub use models::{Payment, PaymentStatus};
pub use order::OrderService;
pub use verify::VerificationService;
