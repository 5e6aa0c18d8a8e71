//! Liveness and readiness probes.
//!
//! Both probes live outside `/api/v1` and are never cached. Readiness flips
//! once the catalogue is loaded and the server is bound; liveness flips off
//! when shutdown begins so load balancers drain early.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;

/// Which claim store backs the running server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreKind {
    Postgres,
    InMemory,
}

/// Shared probe state.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
    store: StoreKind,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProbeBody {
    status: &'static str,
    claim_store: StoreKind,
}

impl HealthState {
    /// Not ready, but live.
    pub fn new(store: StoreKind) -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
            store,
        }
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    pub fn store(&self) -> StoreKind {
        self.store
    }

    fn probe_response(
        &self,
        probe_ok: bool,
        ok: &'static str,
        failing: &'static str,
    ) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(ProbeBody {
                status: if probe_ok { ok } else { failing },
                claim_store: self.store,
            })
    }
}

/// Readiness probe: 200 once the server can take traffic, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_ready(), "ready", "starting")
}

/// Liveness probe: 200 while alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_alive(), "live", "draining")
}
