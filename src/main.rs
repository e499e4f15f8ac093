use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use rollcall_server::auth::handlers::{login, profile, student_login, student_profile};
use rollcall_server::users::list_users;
use rollcall_server::{health_check, not_found, AppError, AppState, Settings};
use std::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> rollcall_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration; a missing database URL or signing secret is fatal
    // here, before anything binds.
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!("Starting server at {}:{}", config.server.host, config.server.port);

    // Initialize application state
    let state = AppState::new(config.clone()).await?;
    let state = web::Data::new(state);

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    info!(
        "Accepting connections at http://{}:{}",
        config.server.host, config.server.port
    );

    HttpServer::new(move || {
        let cors = if config.cors.enabled {
            let cors_config = Cors::default();

            let cors_config = if config.cors.allow_any_origin {
                cors_config
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
            } else {
                let mut restricted = cors_config
                    .allowed_methods(vec!["GET", "POST"])
                    .allowed_headers(vec!["Authorization", "Content-Type"])
                    .supports_credentials();
                for origin in &config.cors.allowed_origins {
                    restricted = restricted.allowed_origin(origin);
                }
                restricted
            };

            cors_config.max_age(config.cors.max_age as usize)
        } else {
            Cors::default()
        };

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .route("/health", web::get().to(health_check))
            .route("/api/users", web::get().to(list_users))
            .route("/api/auth/login", web::post().to(login))
            .route("/api/auth/profile", web::get().to(profile))
            .route("/api/student-auth/login", web::post().to(student_login))
            .route("/api/student-auth/profile", web::get().to(student_profile))
            .default_service(web::route().to(not_found))
    })
    .listen(listener)?
    .workers(config.server.workers as usize)
    .run()
    .await
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}
