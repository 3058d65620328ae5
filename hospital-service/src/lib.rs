pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use hms_core::middleware::rate_limit::{create_ip_rate_limiter, ip_rate_limit_middleware};
use hms_core::middleware::security_headers::security_headers_middleware;
use hms_core::middleware::tracing::request_id_middleware;
use serde_json::json;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::HmsConfig;
use crate::services::{
    AuthService, CredentialService, CredentialStore, EmailProvider, HospitalService,
    MembershipStore, NationalRecordIndex, PatientService, PatientStore, RecordLinker,
    SessionTokenService, TenantResolver,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub hospitals: Arc<HospitalService>,
    pub patients: Arc<PatientService>,
    pub records: Arc<RecordLinker>,
    pub resolver: Arc<TenantResolver>,
    pub config: Arc<HmsConfig>,
}

/// Wire the stores and services together. The email provider is injected
/// so tests can capture or fail deliveries.
pub fn build_state(config: HmsConfig, email: Arc<dyn EmailProvider>) -> AppState {
    let credentials = Arc::new(CredentialService::new(CredentialStore::new()));
    let membership = Arc::new(MembershipStore::new());
    let patient_store = Arc::new(PatientStore::new());
    let index = Arc::new(NationalRecordIndex::new());
    let tokens = Arc::new(SessionTokenService::new(
        &config.jwt.secret,
        config.jwt.token_lifetime_days,
    ));
    let resolver = Arc::new(TenantResolver::new(membership.clone()));

    let auth = Arc::new(AuthService::new(
        credentials.clone(),
        tokens,
        membership.clone(),
        email,
        config.frontend_url.clone(),
    ));
    let hospitals = Arc::new(HospitalService::new(membership.clone(), credentials));
    let patients = Arc::new(PatientService::new(patient_store.clone()));
    let records = Arc::new(RecordLinker::new(index, patient_store, membership));

    AppState {
        auth,
        hospitals,
        patients,
        records,
        resolver,
        config: Arc::new(config),
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "hospital-service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub fn build_router(state: AppState) -> Router {
    let auth_limiter = create_ip_rate_limiter(
        state.config.rate_limit.auth_attempts,
        state.config.rate_limit.auth_window_seconds,
    );
    let global_limiter = create_ip_rate_limiter(
        state.config.rate_limit.global_requests,
        state.config.rate_limit.global_window_seconds,
    );

    // Credential-guessing surface gets the tighter per-IP limiter.
    let rate_limited = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/auth/forgot-password",
            post(handlers::auth::forgot_password),
        )
        .layer(from_fn_with_state(auth_limiter, ip_rate_limit_middleware));

    let public = Router::new()
        .route("/health", get(health_check))
        .route("/api/hospitals", post(handlers::hospital::register_hospital))
        .route(
            "/api/auth/reset-password",
            post(handlers::auth::reset_password),
        );

    // Bearer token required; no tenant scope (me/change-password work even
    // for identities whose membership is gone, and record search is
    // cross-tenant by design).
    let authenticated = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route(
            "/api/auth/change-password",
            put(handlers::auth::change_password),
        )
        .route(
            "/api/medical-records/search",
            get(handlers::record::search_records),
        )
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware));

    // Bearer token plus resolved hospital membership.
    let tenant_scoped = Router::new()
        .route(
            "/api/patients",
            get(handlers::patient::list_patients).post(handlers::patient::create_patient),
        )
        .route("/api/patients/:id", get(handlers::patient::get_patient))
        .route("/api/medical-records", post(handlers::record::create_record))
        .route("/api/staff", post(handlers::staff::create_staff))
        .route(
            "/api/auth/force-password-change/:email",
            put(handlers::auth::force_password_change),
        )
        .layer(from_fn_with_state(state.clone(), middleware::tenant_middleware))
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware));

    let cors = cors_layer(&state.config);

    Router::new()
        .merge(public)
        .merge(rate_limited)
        .merge(authenticated)
        .merge(tenant_scoped)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(from_fn_with_state(global_limiter, ip_rate_limit_middleware))
        .with_state(state)
}

fn cors_layer(config: &HmsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
}
