use httpmock::prelude::*;
use serde_json::json;

use campus_api::{
    ApiClient, ApiError, PersonalDetails, StudentRegistration, TeacherRegistration,
};
use campus_auth::UserRole;
use campus_config::ApiConfig;

fn client(server: &MockServer) -> ApiClient {
    let config = ApiConfig {
        base_url: format!("{}/api/", server.base_url()),
        request_timeout_seconds: 2,
    };
    ApiClient::new(&config).expect("client should build")
}

fn details() -> PersonalDetails {
    PersonalDetails {
        school_slug: "lycee-victor-hugo".into(),
        email: "ada@example.com".into(),
        password: "secret".into(),
        first_name: "Ada".into(),
        last_name: "Obi".into(),
        phone: "0600000000".into(),
    }
}

#[tokio::test]
async fn login_posts_credentials_and_returns_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/auth/login")
                .json_body(json!({"email": "ada@example.com", "password": "pw"}));
            then.status(200).json_body(json!({
                "success": true,
                "data": {
                    "access_token": "tok-123",
                    "user": {
                        "id": 7,
                        "full_name": "Ada Obi",
                        "role": "student",
                        "status": "active",
                        "email": "ada@example.com"
                    }
                }
            }));
        })
        .await;

    let login = client(&server)
        .login("ada@example.com", "pw")
        .await
        .expect("login should succeed");

    mock.assert_async().await;
    assert_eq!(login.access_token, "tok-123");
    assert_eq!(login.user.id, 7);
    assert_eq!(login.user.role, UserRole::Student);
}

#[tokio::test]
async fn login_failure_surfaces_server_error_field() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/auth/login");
            then.status(401)
                .json_body(json!({"success": false, "error": "Invalid credentials"}));
        })
        .await;

    let err = client(&server)
        .login("ada@example.com", "wrong")
        .await
        .expect_err("login should fail");

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Invalid credentials");
}

#[tokio::test]
async fn success_false_maps_to_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/schools");
            then.status(200)
                .json_body(json!({"success": false, "message": "Maintenance"}));
        })
        .await;

    let err = client(&server).list_schools().await.expect_err("rejected");
    assert!(matches!(err, ApiError::Rejected(ref m) if m == "Maintenance"));
}

#[tokio::test]
async fn schools_classes_and_subjects_are_listed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/schools");
            then.status(200).json_body(json!({
                "success": true,
                "data": [{"id": 1, "name": "Lycee Victor Hugo", "slug": "lycee-victor-hugo",
                          "address": "1 rue", "phone": "01", "status": "active"}]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/schools/1/classes");
            then.status(200).json_body(json!({
                "success": true,
                "data": [{"id": 12, "name": "Terminale S", "level": "terminale",
                          "section": "A", "capacity": 30, "academic_year": "2026-2027"}]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/schools/1/subjects");
            then.status(200).json_body(json!({
                "success": true,
                "data": [{"id": 4, "name": "Mathematiques", "code": "MATH"}]
            }));
        })
        .await;

    let api = client(&server);
    let schools = api.list_schools().await.unwrap();
    assert_eq!(schools.len(), 1);
    assert_eq!(schools[0].slug, "lycee-victor-hugo");

    let classes = api.classes_by_school(1).await.unwrap();
    assert_eq!(classes[0].id, 12);
    assert_eq!(classes[0].capacity, Some(30));

    let subjects = api.subjects_by_school(1).await.unwrap();
    assert_eq!(subjects[0].code.as_deref(), Some("MATH"));
    assert!(subjects[0].description.is_none());
}

#[tokio::test]
async fn profile_endpoints_send_bearer_token() {
    let server = MockServer::start_async().await;
    let profile_mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/profile")
                .header("Authorization", "Bearer tok-123");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"first_name": "Ada", "full_name": "Ada Obi", "email": "ada@example.com",
                         "role": "student", "status": "active", "school_id": 1}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/profile/classes")
                .header("Authorization", "Bearer tok-123");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"classes": [{"id": 12, "name": "Terminale S"}]}
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/profile/subjects")
                .header("Authorization", "Bearer tok-123");
            then.status(200).json_body(json!({
                "success": true,
                "data": {"subjects": []}
            }));
        })
        .await;

    let api = client(&server);
    let profile = api.profile("tok-123").await.unwrap();
    profile_mock.assert_async().await;
    assert!(profile.is_student());
    assert_eq!(profile.display_name(), "Ada");

    let classes = api.my_classes("tok-123").await.unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "Terminale S");

    assert!(api.my_subjects("tok-123").await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_data_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/profile");
            then.status(200).json_body(json!({"success": true}));
        })
        .await;

    let err = client(&server).profile("t").await.expect_err("no data");
    assert!(matches!(err, ApiError::MissingData));
}

#[tokio::test]
async fn student_registration_posts_flat_payload() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/students/register").json_body(json!({
                "school_slug": "lycee-victor-hugo",
                "email": "ada@example.com",
                "password": "secret",
                "first_name": "Ada",
                "last_name": "Obi",
                "phone": "0600000000",
                "class_id": 12
            }));
            then.status(201).json_body(json!({
                "success": true,
                "message": "Registration pending approval"
            }));
        })
        .await;

    let outcome = client(&server)
        .register_student(&StudentRegistration {
            details: details(),
            class_id: 12,
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(
        outcome.message.as_deref(),
        Some("Registration pending approval")
    );
}

#[tokio::test]
async fn teacher_registration_is_validated_before_sending() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/teachers/register");
            then.status(201).json_body(json!({"success": true}));
        })
        .await;

    let err = client(&server)
        .register_teacher(&TeacherRegistration {
            details: details(),
            subject_ids: vec![],
        })
        .await
        .expect_err("validation should fail");

    assert!(matches!(err, ApiError::Validation(_)));
    mock.assert_hits_async(0).await;
}

#[tokio::test]
async fn registration_conflict_uses_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/teachers/register");
            then.status(409)
                .json_body(json!({"success": false, "message": "Email already used"}));
        })
        .await;

    let err = client(&server)
        .register_teacher(&TeacherRegistration {
            details: details(),
            subject_ids: vec![4, 5],
        })
        .await
        .expect_err("conflict");

    assert!(matches!(err, ApiError::Status { status: 409, .. }));
    assert_eq!(err.user_message(), "Email already used");
}
