//! API server — router assembly, bearer-auth middleware, HTTP + metrics.

use crate::envelope::{self, ApiError};
use crate::{auth_rest, campaigns_rest, offerings_rest, students_rest};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post, put};
use axum::Router;
use reach_campaigns::CampaignService;
use reach_core::config::AppConfig;
use reach_crm::{OfferingStore, StudentStore};
use reach_platform::AuthService;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub students: Arc<StudentStore>,
    pub offerings: Arc<OfferingStore>,
    pub campaigns: Arc<CampaignService>,
}

/// Bearer-token guard for the facilitator-scoped routes. On success the
/// authenticated `Facilitator` is attached as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            envelope::error(
                StatusCode::UNAUTHORIZED,
                "auth_required",
                "Missing bearer token",
            )
        })?;

    let facilitator = state.auth.authenticate(token).ok_or_else(|| {
        envelope::error(
            StatusCode::UNAUTHORIZED,
            "auth_failed",
            "Invalid or expired session",
        )
    })?;

    req.extensions_mut().insert(facilitator);
    Ok(next.run(req).await)
}

pub struct ApiServer {
    config: AppConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: AppConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Build the full application router.
    pub fn router(&self) -> Router {
        let protected = Router::new()
            // Campaigns
            .route(
                "/api/campaigns",
                get(campaigns_rest::list_campaigns).post(campaigns_rest::create_campaign),
            )
            // Clients also use the trailing-slash form; axum matches exactly.
            .route(
                "/api/campaigns/",
                get(campaigns_rest::list_campaigns).post(campaigns_rest::create_campaign),
            )
            .route("/api/campaigns/templates", get(campaigns_rest::templates))
            .route("/api/campaigns/{id}", get(campaigns_rest::get_campaign))
            .route(
                "/api/campaigns/{id}/targets",
                get(campaigns_rest::campaign_targets),
            )
            .route(
                "/api/campaigns/{id}/launch",
                post(campaigns_rest::launch_campaign),
            )
            .route(
                "/api/campaigns/{id}/status",
                put(campaigns_rest::override_status).get(campaigns_rest::campaign_status),
            )
            .route(
                "/api/campaigns/{id}/call-logs",
                get(campaigns_rest::call_logs),
            )
            // Students
            .route(
                "/api/students",
                get(students_rest::list_students).post(students_rest::create_student),
            )
            .route(
                "/api/students/",
                get(students_rest::list_students).post(students_rest::create_student),
            )
            .route(
                "/api/students/{id}",
                put(students_rest::update_student).delete(students_rest::delete_student),
            )
            .route("/api/students/import-csv", post(students_rest::import_csv))
            // Offerings
            .route(
                "/api/offerings",
                get(offerings_rest::list_offerings).post(offerings_rest::create_offering),
            )
            .route(
                "/api/offerings/",
                get(offerings_rest::list_offerings).post(offerings_rest::create_offering),
            )
            .route(
                "/api/offerings/{id}",
                put(offerings_rest::update_offering).delete(offerings_rest::delete_offering),
            )
            // Facilitator profile
            .route(
                "/api/facilitator/profile",
                get(auth_rest::get_profile).put(auth_rest::update_profile),
            )
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                require_auth,
            ));

        Router::new()
            .route("/health", get(health_check))
            .route("/api/auth/send-otp", post(auth_rest::send_otp))
            .route("/api/auth/verify-otp", post(auth_rest::verify_otp))
            .route("/api/students/sample-csv", get(students_rest::sample_csv))
            .merge(protected)
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the HTTP server (blocks until shutdown).
    pub async fn start_http(&self) -> anyhow::Result<()> {
        let addr = SocketAddr::new(self.config.api.host.parse()?, self.config.api.http_port);
        info!(addr = %addr, "Starting HTTP server");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await?;
        Ok(())
    }

    /// Start the Prometheus exporter on its own port.
    pub async fn start_metrics(&self) -> anyhow::Result<()> {
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(SocketAddr::new(
                self.config.api.host.parse()?,
                self.config.metrics.port,
            ))
            .install()?;
        info!(port = self.config.metrics.port, "Metrics exporter started");
        Ok(())
    }
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
