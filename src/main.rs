//! CourseDeck server entry point.

use std::sync::Arc;

use coursedeck::auth::AuthService;
use coursedeck::config::AppConfig;
use coursedeck::content::ContentStore;
use coursedeck::db::Database;
use coursedeck::gateway::{run_server, state::AppState};
use coursedeck::logging::init_logging;
use coursedeck::payment::RazorpayClient;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    println!("📋 Environment: {}", env);
    tracing::info!(env = %env, "starting coursedeck");

    let db = match Database::connect(&config.postgres_url).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("❌ FATAL: Failed to connect to PostgreSQL: {}", e);
            eprintln!("   Hint: check postgres_url in config/{}.yaml", env);
            std::process::exit(1);
        }
    };
    println!("✅ PostgreSQL connected");

    let auth = Arc::new(AuthService::new(
        db.pool().clone(),
        config.jwt_secret.clone(),
    ));

    let payment_gateway = match RazorpayClient::new(&config.razorpay) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("❌ FATAL: Failed to build payment gateway client: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        db,
        auth,
        payment_gateway,
        gateway_key_id: config.razorpay.key_id.clone(),
        gateway_secret: config.razorpay.key_secret.clone(),
        currency: config.razorpay.currency.clone(),
        content: ContentStore::new(&config.uploads.dir),
    });

    run_server(&config.gateway.host, config.gateway.port, state).await;
}
