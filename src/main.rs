//! Ticketflow server entry point.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use ticketflow::adapters::ai::GeminiAnalyzer;
use ticketflow::adapters::auth::{BcryptPasswordHasher, JwtTokenService};
use ticketflow::adapters::email::ResendMailer;
use ticketflow::adapters::gateway::{MockGateway, RazorpayGateway};
use ticketflow::adapters::http::{api_router, AppState};
use ticketflow::adapters::postgres::{
    PostgresPaymentRepository, PostgresTicketRepository, PostgresUserRepository,
};
use ticketflow::adapters::runner::TokioJobRunner;
use ticketflow::application::handlers::analysis::ProcessTicketHandler;
use ticketflow::application::handlers::auth::PasswordResetFlow;
use ticketflow::application::jobs::JobRouter;
use ticketflow::config::AppConfig;
use ticketflow::ports::{
    JobQueue, Mailer, PasswordHasher, PaymentGateway, TicketAnalyzer, TicketRepository,
    TokenService, UserRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database connected and migrated");

    // Repositories
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let tickets: Arc<dyn TicketRepository> = Arc::new(PostgresTicketRepository::new(pool.clone()));
    let payments = Arc::new(PostgresPaymentRepository::new(pool));

    // External collaborators
    let gateway: Arc<dyn PaymentGateway> = if config.payment.is_mock() {
        tracing::warn!("payment gateway running in mock mode");
        Arc::new(MockGateway::new())
    } else {
        Arc::new(RazorpayGateway::new(config.payment.clone()))
    };
    let analyzer: Arc<dyn TicketAnalyzer> = Arc::new(GeminiAnalyzer::new(config.ai.clone()));
    let mailer: Arc<dyn Mailer> = Arc::new(ResendMailer::new(config.email.clone()));
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_secs,
    ));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(BcryptPasswordHasher::new());

    // Background runner: the same operations the HTTP layer falls back
    // to inline when enqueueing fails.
    let pipeline = Arc::new(ProcessTicketHandler::new(
        tickets.clone(),
        users.clone(),
        analyzer.clone(),
        mailer.clone(),
    ));
    let reset_flow = Arc::new(PasswordResetFlow::new(
        users.clone(),
        mailer.clone(),
        config.server.frontend_url.clone(),
        config.auth.reset_token_ttl_secs,
    ));
    let queue: Arc<dyn JobQueue> = Arc::new(TokioJobRunner::start(Arc::new(JobRouter::new(
        pipeline,
        reset_flow,
    ))));

    let state = AppState {
        users,
        tickets,
        payments,
        gateway,
        analyzer,
        mailer,
        queue,
        tokens,
        hasher,
        payment_config: config.payment.clone(),
        frontend_url: config.server.frontend_url.clone(),
        reset_token_ttl_secs: config.auth.reset_token_ttl_secs,
    };

    let cors = cors_layer(config.server.cors_origins_list());
    let app = api_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: Vec<String>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    if origins.is_empty() {
        layer.allow_origin(tower_http::cors::Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
