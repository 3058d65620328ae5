mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn hospital_admin_can_log_in() {
    let app = TestApp::spawn();
    let (_, _) = app
        .register_hospital("Test Clinic", "L1", "admin@test.com", "Abcdef1!")
        .await;

    let (status, body) = app.login("admin@test.com", "Abcdef1!").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["forcePasswordChange"], json!(false));
    assert_eq!(body["data"]["user"]["role"], json!("HOSPITAL_ADMIN"));
    assert_eq!(body["data"]["hospital"]["name"], json!("Test Clinic"));
}

#[tokio::test]
async fn wrong_password_is_a_generic_401() {
    let app = TestApp::spawn();
    app.register_hospital("Test Clinic", "L1", "admin@test.com", "Abcdef1!")
        .await;

    let (status, body) = app.login("admin@test.com", "WrongPw1!").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (unknown_status, unknown_body) = app.login("ghost@test.com", "WrongPw1!").await;
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    // Unknown account and wrong password are indistinguishable.
    assert_eq!(body["error"], unknown_body["error"]);
}

#[tokio::test]
async fn duplicate_hospital_license_is_rejected() {
    let app = TestApp::spawn();
    app.register_hospital("Clinic A", "L1", "a@test.com", "Abcdef1!")
        .await;

    let (status, _) = app
        .post(
            "/api/hospitals",
            json!({
                "name": "Clinic B",
                "licenseNumber": "L1",
                "contactEmail": "b@example.com",
                "adminEmail": "b@test.com",
                "adminFirstName": "Admin",
                "adminLastName": "User",
                "adminPassword": "Abcdef1!",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn weak_admin_password_fails_hospital_registration() {
    let app = TestApp::spawn();
    let (status, body) = app
        .post(
            "/api/hospitals",
            json!({
                "name": "Clinic",
                "licenseNumber": "L9",
                "contactEmail": "c@example.com",
                "adminEmail": "admin@test.com",
                "adminFirstName": "Admin",
                "adminLastName": "User",
                "adminPassword": "welcome",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
}

#[tokio::test]
async fn staff_registration_and_duplicate_email() {
    let app = TestApp::spawn();
    let (hospital_id, admin_token) = app
        .register_hospital("Test Clinic", "L1", "admin@test.com", "Abcdef1!")
        .await;

    app.register_staff(&admin_token, &hospital_id, "doc@test.com", "Doctor#Aa1", "DOCTOR")
        .await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            json!({
                "hospitalId": hospital_id,
                "email": "doc@test.com",
                "password": "Doctor#Aa1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn registration_requires_a_provisioned_membership() {
    let app = TestApp::spawn();
    let (hospital_id, admin_token) = app
        .register_hospital("Test Clinic", "L1", "admin@test.com", "Abcdef1!")
        .await;

    // No roster row for this email: the hospital id alone buys nothing.
    let (status, _) = app
        .post(
            "/api/auth/register",
            json!({
                "hospitalId": hospital_id,
                "email": "rogue@test.com",
                "password": "Rogue#Aa1",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (login_status, _) = app.login("rogue@test.com", "Rogue#Aa1").await;
    assert_eq!(login_status, StatusCode::UNAUTHORIZED);

    // A roster row bound to a different hospital does not transfer.
    app.provision_staff(&admin_token, "doc@test.com", "DOCTOR")
        .await;
    let (mismatch_status, _) = app
        .post(
            "/api/auth/register",
            json!({
                "hospitalId": "00000000-0000-0000-0000-000000000000",
                "email": "doc@test.com",
                "password": "Doctor#Aa1",
            }),
        )
        .await;
    assert_eq!(mismatch_status, StatusCode::FORBIDDEN);

    // The matching hospital completes registration.
    let (ok_status, body) = app
        .post(
            "/api/auth/register",
            json!({
                "hospitalId": hospital_id,
                "email": "doc@test.com",
                "password": "Doctor#Aa1",
            }),
        )
        .await;
    assert_eq!(ok_status, StatusCode::CREATED, "{body}");
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["data"]["user"]["role"], json!("DOCTOR"));
}

#[tokio::test]
async fn registering_a_hospital_cannot_capture_existing_staff() {
    let app = TestApp::spawn();
    let (hospital_id, admin_token) = app
        .register_hospital("Clinic A", "LA", "admin-a@test.com", "Abcdef1!")
        .await;
    app.register_staff(&admin_token, &hospital_id, "doc@test.com", "Doctor#Aa1", "DOCTOR")
        .await;

    // Anonymous onboarding naming an already-bound admin email fails.
    let (status, _) = app
        .post(
            "/api/hospitals",
            json!({
                "name": "Evil Clinic",
                "licenseNumber": "LE",
                "contactEmail": "evil@example.com",
                "adminEmail": "doc@test.com",
                "adminFirstName": "Evil",
                "adminLastName": "Twin",
                "adminPassword": "Evil#Aa1!",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The victim's membership is untouched.
    let token = app.login_ok("doc@test.com", "Doctor#Aa1").await;
    let (me_status, me_body) = app.get_auth("/api/auth/me", &token).await;
    assert_eq!(me_status, StatusCode::OK);
    assert_eq!(me_body["data"]["hospital"]["name"], json!("Clinic A"));
    assert_eq!(me_body["data"]["user"]["role"], json!("DOCTOR"));
}

#[tokio::test]
async fn weak_staff_password_reports_unmet_rules() {
    let app = TestApp::spawn();
    let (hospital_id, admin_token) = app
        .register_hospital("Test Clinic", "L1", "admin@test.com", "Abcdef1!")
        .await;
    app.provision_staff(&admin_token, "doc@test.com", "DOCTOR")
        .await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            json!({
                "hospitalId": hospital_id,
                "email": "doc@test.com",
                "password": "alllowercase",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("uppercase"), "{message}");
    assert!(message.contains("number"), "{message}");
    assert!(message.contains("special character"), "{message}");
}

#[tokio::test]
async fn me_requires_a_valid_token() {
    let app = TestApp::spawn();
    app.register_hospital("Test Clinic", "L1", "admin@test.com", "Abcdef1!")
        .await;
    let token = app.login_ok("admin@test.com", "Abcdef1!").await;

    let (status, body) = app.get_auth("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], json!("admin@test.com"));

    let (no_token_status, _) = app.request(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(no_token_status, StatusCode::UNAUTHORIZED);

    let (garbage_status, _) = app.get_auth("/api/auth/me", "not-a-jwt").await;
    assert_eq!(garbage_status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = TestApp::spawn();
    app.register_hospital("Test Clinic", "L1", "Admin@Test.com", "Abcdef1!")
        .await;

    let (status, _) = app.login("ADMIN@TEST.COM", "Abcdef1!").await;
    assert_eq!(status, StatusCode::OK);
}
