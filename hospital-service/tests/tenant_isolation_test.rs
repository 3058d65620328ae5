mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

async fn create_patient(app: &TestApp, token: &str, first_name: &str, pan: &str) -> String {
    let (status, body) = app
        .post_auth(
            "/api/patients",
            token,
            json!({
                "firstName": first_name,
                "lastName": "Sharma",
                "panNumber": pan,
                "medicalHistory": "Hypertension",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["patient"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn patient_lists_never_cross_hospitals() {
    let app = TestApp::spawn();
    let (_, token_a) = app
        .register_hospital("Clinic A", "LA", "admin-a@test.com", "Abcdef1!")
        .await;
    let (_, token_b) = app
        .register_hospital("Clinic B", "LB", "admin-b@test.com", "Abcdef1!")
        .await;

    // Identical patient data registered in both hospitals.
    create_patient(&app, &token_a, "Ravi", "ABCDE1234F").await;
    create_patient(&app, &token_b, "Ravi", "ABCDE1234F").await;
    create_patient(&app, &token_b, "Meera", "FGHIJ5678K").await;

    let (status, body) = app.get_auth("/api/patients", &token_a).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!(1));

    let (status, body) = app.get_auth("/api/patients", &token_b).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!(2));
    // Newest registration first.
    assert_eq!(body["data"]["patients"][0]["firstName"], json!("Meera"));
}

#[tokio::test]
async fn foreign_patient_id_reads_as_missing() {
    let app = TestApp::spawn();
    let (_, token_a) = app
        .register_hospital("Clinic A", "LA", "admin-a@test.com", "Abcdef1!")
        .await;
    let (_, token_b) = app
        .register_hospital("Clinic B", "LB", "admin-b@test.com", "Abcdef1!")
        .await;

    let patient_id = create_patient(&app, &token_a, "Ravi", "ABCDE1234F").await;

    // The owner sees it.
    let (owner_status, _) = app
        .get_auth(&format!("/api/patients/{patient_id}"), &token_a)
        .await;
    assert_eq!(owner_status, StatusCode::OK);

    // The other hospital gets the same 404 as for a nonexistent id.
    let (foreign_status, _) = app
        .get_auth(&format!("/api/patients/{patient_id}"), &token_b)
        .await;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patient_codes_are_per_hospital() {
    let app = TestApp::spawn();
    let (_, token_a) = app
        .register_hospital("Clinic A", "LA", "admin-a@test.com", "Abcdef1!")
        .await;
    let (_, token_b) = app
        .register_hospital("Clinic B", "LB", "admin-b@test.com", "Abcdef1!")
        .await;

    create_patient(&app, &token_a, "Ravi", "ABCDE1234F").await;
    create_patient(&app, &token_a, "Meera", "FGHIJ5678K").await;
    create_patient(&app, &token_b, "Asha", "KLMNO9012P").await;

    let (_, body_a) = app.get_auth("/api/patients", &token_a).await;
    assert_eq!(body_a["data"]["patients"][0]["patientCode"], json!("P-00002"));

    let (_, body_b) = app.get_auth("/api/patients", &token_b).await;
    assert_eq!(body_b["data"]["patients"][0]["patientCode"], json!("P-00001"));
}

#[tokio::test]
async fn admins_cannot_force_changes_across_hospitals() {
    let app = TestApp::spawn();
    let (hospital_a, admin_a) = app
        .register_hospital("Clinic A", "LA", "admin-a@test.com", "Abcdef1!")
        .await;
    let (_, admin_b) = app
        .register_hospital("Clinic B", "LB", "admin-b@test.com", "Abcdef1!")
        .await;
    app.register_staff(&admin_a, &hospital_a, "pharm@test.com", "Pharma#Aa1", "PHARMACIST")
        .await;

    // The other hospital's admin is forbidden, and nothing is flagged.
    let (status, _) = app
        .put_auth(
            "/api/auth/force-password-change/pharm@test.com",
            &admin_b,
            json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = app.login_ok("pharm@test.com", "Pharma#Aa1").await;
    let (me_status, me_body) = app.get_auth("/api/auth/me", &token).await;
    assert_eq!(me_status, StatusCode::OK);
    assert_eq!(me_body["forcePasswordChange"], json!(false));

    // The home-hospital admin can.
    let (home_status, _) = app
        .put_auth(
            "/api/auth/force-password-change/pharm@test.com",
            &admin_a,
            json!({}),
        )
        .await;
    assert_eq!(home_status, StatusCode::OK);
}
