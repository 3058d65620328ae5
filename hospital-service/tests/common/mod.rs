#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use async_trait::async_trait;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use hospital_service::config::HmsConfig;
use hospital_service::services::{EmailProvider, ServiceError};
use hospital_service::{build_router, build_state};

/// Email provider that records deliveries instead of sending them.
#[derive(Default)]
pub struct CapturingEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub token: String,
}

#[async_trait]
impl EmailProvider for CapturingEmailService {
    async fn send_password_reset_email(
        &self,
        to: &str,
        token: &str,
        _base_url: &str,
    ) -> Result<(), ServiceError> {
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }
}

/// Email provider whose deliveries always fail.
pub struct FailingEmailService;

#[async_trait]
impl EmailProvider for FailingEmailService {
    async fn send_password_reset_email(
        &self,
        _to: &str,
        _token: &str,
        _base_url: &str,
    ) -> Result<(), ServiceError> {
        Err(ServiceError::EmailDelivery("smtp relay down".to_string()))
    }
}

pub struct TestApp {
    router: Router,
    pub emails: Arc<CapturingEmailService>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let emails = Arc::new(CapturingEmailService::default());
        let state = build_state(HmsConfig::for_tests(), emails.clone());
        Self {
            router: build_router(state),
            emails,
        }
    }

    pub fn spawn_with_failing_email() -> Self {
        let state = build_state(HmsConfig::for_tests(), Arc::new(FailingEmailService));
        Self {
            router: build_router(state),
            emails: Arc::new(CapturingEmailService::default()),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, None, Some(body)).await
    }

    pub async fn post_auth(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put_auth(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(token), None).await
    }

    /// Register a hospital and return `(hospital_id, admin_token)`.
    pub async fn register_hospital(
        &self,
        name: &str,
        license: &str,
        admin_email: &str,
        admin_password: &str,
    ) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/hospitals",
                json!({
                    "name": name,
                    "licenseNumber": license,
                    "contactEmail": format!("contact+{}@example.com", license),
                    "adminEmail": admin_email,
                    "adminFirstName": "Admin",
                    "adminLastName": "User",
                    "adminPassword": admin_password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "hospital registration: {body}");
        let hospital_id = body["data"]["hospital"]["id"].as_str().unwrap().to_string();

        let token = self.login_ok(admin_email, admin_password).await;
        (hospital_id, token)
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/auth/login",
            json!({ "email": email, "password": password }),
        )
        .await
    }

    pub async fn login_ok(&self, email: &str, password: &str) -> String {
        let (status, body) = self.login(email, password).await;
        assert_eq!(status, StatusCode::OK, "login: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Provision a membership as the admin, complete registration with the
    /// staff member's own password, and return their session token.
    pub async fn register_staff(
        &self,
        admin_token: &str,
        hospital_id: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> String {
        self.provision_staff(admin_token, email, role).await;

        let (status, body) = self
            .post(
                "/api/auth/register",
                json!({
                    "hospitalId": hospital_id,
                    "email": email,
                    "password": password,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "staff registration: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a membership row without an invite credential.
    pub async fn provision_staff(&self, admin_token: &str, email: &str, role: &str) {
        let (status, body) = self
            .post_auth(
                "/api/staff",
                admin_token,
                json!({
                    "email": email,
                    "firstName": "Test",
                    "lastName": "Staff",
                    "role": role,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "staff provisioning: {body}");
    }
}
