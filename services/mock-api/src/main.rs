use anyhow::Result;
use common::models::Role;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use mock_api::{AppState, create_router, jwt::JwtService, store::REGISTRATION_KEY};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting mock manga API");

    let state = AppState::new(JwtService::from_env());

    // Seed an admin account so the console can be exercised
    let admin_user = std::env::var("MOCK_API_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
    let admin_password =
        std::env::var("MOCK_API_ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    {
        let mut store = state.store.lock().await;
        store.create_user(
            &admin_user,
            &format!("{}@localhost", admin_user),
            &admin_password,
            Role::Admin,
        )?;
        store.set_config(REGISTRATION_KEY, "true");
    }
    info!("Seeded admin account {}", admin_user);

    let app = create_router(state);

    let addr = std::env::var("MOCK_API_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Mock manga API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
