// src/api/mod.rs

pub mod admin_routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;

use crate::cache::gateway::CacheGateway;
use crate::cache::invalidation::InvalidationRouter;

/// Shared state for the operational endpoints.
#[derive(Clone)]
pub struct AdminState {
    pub gateway: CacheGateway,
    pub router: InvalidationRouter,
}

/// Install a fmt subscriber honoring `RUST_LOG`; a no-op if one is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().ok();
}

/// Serve the operational surface: cache purges, TTL report, counters.
pub async fn start_admin_server(state: AdminState, host: &str, port: u16) -> std::io::Result<()> {
    info!(host = %host, port, "starting cache admin server");
    let data = web::Data::new(state);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(data.clone())
            .configure(admin_routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
