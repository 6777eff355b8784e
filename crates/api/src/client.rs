use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use campus_config::ApiConfig;

use crate::errors::{ApiError, ApiResult};
use crate::registration::{StudentRegistration, TeacherRegistration};
use crate::types::{
    ClassItem, ClassList, Envelope, ErrorBody, LoginRequest, LoginResponse, Profile,
    RegistrationOutcome, School, SubjectItem, SubjectList,
};

/// Client for the platform's JSON API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginRequest { email, password });
        let envelope = execute::<LoginResponse>(request, None).await?;
        require_data(envelope)
    }

    pub async fn list_schools(&self) -> ApiResult<Vec<School>> {
        self.get_data("/schools", None).await
    }

    pub async fn classes_by_school(&self, school_id: i64) -> ApiResult<Vec<ClassItem>> {
        self.get_data(&format!("/schools/{school_id}/classes"), None)
            .await
    }

    pub async fn subjects_by_school(&self, school_id: i64) -> ApiResult<Vec<SubjectItem>> {
        self.get_data(&format!("/schools/{school_id}/subjects"), None)
            .await
    }

    pub async fn register_student(
        &self,
        registration: &StudentRegistration,
    ) -> ApiResult<RegistrationOutcome> {
        registration.validate()?;
        self.register("/students/register", registration).await
    }

    pub async fn register_teacher(
        &self,
        registration: &TeacherRegistration,
    ) -> ApiResult<RegistrationOutcome> {
        registration.validate()?;
        self.register("/teachers/register", registration).await
    }

    pub async fn profile(&self, token: &str) -> ApiResult<Profile> {
        self.get_data("/profile", Some(token)).await
    }

    pub async fn my_classes(&self, token: &str) -> ApiResult<Vec<ClassItem>> {
        let list: ClassList = self.get_data("/profile/classes", Some(token)).await?;
        Ok(list.classes)
    }

    pub async fn my_subjects(&self, token: &str) -> ApiResult<Vec<SubjectItem>> {
        let list: SubjectList = self.get_data("/profile/subjects", Some(token)).await?;
        Ok(list.subjects)
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, token: Option<&str>) -> ApiResult<T> {
        let request = self.http.get(self.url(path));
        let envelope = execute::<T>(request, token).await?;
        require_data(envelope)
    }

    async fn register<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<RegistrationOutcome> {
        let request = self.http.post(self.url(path)).json(body);
        let envelope = execute::<serde_json::Value>(request, None).await?;
        Ok(RegistrationOutcome {
            message: envelope.reason().map(str::to_string),
        })
    }
}

async fn execute<T: DeserializeOwned>(
    mut request: RequestBuilder,
    token: Option<&str>,
) -> ApiResult<Envelope<T>> {
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    read_envelope(response).await
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> ApiResult<Envelope<T>> {
    let status = response.status();
    let path = response.url().path().to_string();
    let body = response.text().await?;

    if !status.is_success() {
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        warn!(path = %path, status = status.as_u16(), "api request failed");
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&body)?;
    if !envelope.success {
        let message = envelope.reason().unwrap_or("request rejected").to_string();
        debug!(path = %path, "api request rejected");
        return Err(ApiError::Rejected(message));
    }
    Ok(envelope)
}

fn require_data<T>(envelope: Envelope<T>) -> ApiResult<T> {
    envelope.data.ok_or(ApiError::MissingData)
}
