//! Liveness and readiness probes for orchestrators and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use pagination::Envelope;

/// Readiness and liveness flags shared with the probes.
///
/// Starts live but not ready; the server marks itself ready once bound.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness so the process is drained before shutdown.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool, ok: &str, failing: &str) -> HttpResponse {
        let (mut response, envelope) = if probe_ok {
            (HttpResponse::Ok(), Envelope::acknowledged(ok))
        } else {
            (
                HttpResponse::ServiceUnavailable(),
                Envelope::failure(failing, Vec::new()),
            )
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(envelope)
    }
}

/// Readiness probe. `200` once the server can take traffic, `503` before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic", body = super::schemas::AckSchema),
        (status = 503, description = "Server is not ready", body = super::schemas::AckSchema)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready(), "Ready", "Not ready")
}

/// Liveness probe. `200` while alive, `503` once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive", body = super::schemas::AckSchema),
        (status = 503, description = "Server is shutting down", body = super::schemas::AckSchema)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive(), "Alive", "Shutting down")
}
