// src/api/admin_routes.rs

use actix_web::{web, Error, HttpResponse};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::AdminState;
use crate::cache::key::TenantId;
use crate::cache::policy::CachePolicy;

/// Short request ID for log correlation.
fn generate_request_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

#[derive(Serialize)]
struct TtlEntry {
    kind: String,
    ttl_secs: u64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin/cache")
            .route("/purge", web::post().to(purge_all))
            .route("/purge/{tenant}", web::post().to(purge_tenant))
            .route("/ttls", web::get().to(ttl_report))
            .route("/stats", web::get().to(gateway_stats)),
    )
    .route("/health", web::get().to(health_check));
}

pub async fn health_check() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// POST /admin/cache/purge — destroy every cached artifact, all tenants.
pub async fn purge_all(state: web::Data<AdminState>) -> Result<HttpResponse, Error> {
    let request_id = generate_request_id();
    let removed = state.router.purge_all().await;

    tracing::info!(request_id = %request_id, removed, "global cache purge");
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "removed_keys": removed,
        "request_id": request_id,
    })))
}

/// POST /admin/cache/purge/{tenant} — destroy every cached artifact for one tenant.
pub async fn purge_tenant(
    state: web::Data<AdminState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let request_id = generate_request_id();
    let tenant = TenantId(path.into_inner());
    let purged_kinds = state.router.purge_tenant(tenant).await;

    tracing::info!(request_id = %request_id, tenant = %tenant, purged_kinds, "tenant cache purge");
    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "tenant": tenant,
        "purged_kinds": purged_kinds,
        "request_id": request_id,
    })))
}

/// GET /admin/cache/ttls — configured TTL per cache kind.
pub async fn ttl_report() -> Result<HttpResponse, Error> {
    let request_id = generate_request_id();
    let ttls: Vec<TtlEntry> = CachePolicy::report()
        .into_iter()
        .map(|(kind, ttl)| TtlEntry {
            kind: kind.as_str().to_string(),
            ttl_secs: ttl.as_secs(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "ttls": ttls,
        "request_id": request_id,
    })))
}

/// GET /admin/cache/stats — gateway hit/miss counters.
pub async fn gateway_stats(state: web::Data<AdminState>) -> Result<HttpResponse, Error> {
    let request_id = generate_request_id();
    let stats = state.gateway.stats();

    Ok(HttpResponse::Ok().json(json!({
        "status": "ok",
        "stats": stats,
        "request_id": request_id,
    })))
}
