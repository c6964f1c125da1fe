use crate::models::{
    AttendanceBody, AttendanceEntry, Fee, FeeBody, Report, ReportBody, Student,
};
use crate::reconcile::{AttendanceUpsert, Operation};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Backend returned {status} for {url}: {body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },
    #[error("Failed to decode response from {url}. Body (first 500 chars): {body}")]
    Decode { url: String, body: String },
}

/// HTTP client for the tuition backend. All entity authority lives there;
/// this client only fetches snapshots and issues writes.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, base_url }
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("tuition-console"));
        headers
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .headers(self.build_headers())
            .send()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(ApiError::Status { status, url, body });
        }

        serde_json::from_str(&body).map_err(|_| ApiError::Decode {
            url,
            body: body.chars().take(500).collect(),
        })
    }

    /// Issue a write and discard the response body. Success state on pages
    /// is refreshed by a re-fetch, never by trusting a write response.
    async fn write(
        &self,
        builder: reqwest::RequestBuilder,
        url: String,
    ) -> Result<(), ApiError> {
        let response = builder
            .headers(self.build_headers())
            .send()
            .await
            .map_err(|source| ApiError::Network {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, url, body });
        }

        Ok(())
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, path);
        self.write(self.client.post(&url).json(body), url).await
    }

    async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, path);
        self.write(self.client.put(&url).json(body), url).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, path);
        self.write(self.client.delete(&url), url).await
    }

    // ------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------

    pub async fn list_students(&self) -> Result<Vec<Student>, ApiError> {
        self.get("/student/all").await
    }

    pub async fn add_student(&self, student: &Student) -> Result<(), ApiError> {
        self.post("/student/add", student).await
    }

    pub async fn update_student(&self, student: &Student) -> Result<(), ApiError> {
        self.put("/student/update", student).await
    }

    pub async fn delete_student(&self, std_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/student/delete/{}", std_id)).await
    }

    // ------------------------------------------------------------------
    // Attendance
    // ------------------------------------------------------------------

    pub async fn attendance_for_date(&self, date: &str) -> Result<Vec<AttendanceEntry>, ApiError> {
        self.get(&format!("/attendance/date/{}", date)).await
    }

    pub async fn attendance_history(&self, std_id: &str) -> Result<Vec<AttendanceEntry>, ApiError> {
        self.get(&format!("/attendance/student/{}", std_id)).await
    }

    /// Bare count of days marked present.
    pub async fn present_count(&self, std_id: &str) -> Result<u64, ApiError> {
        self.get(&format!("/attendance/present/student/{}", std_id))
            .await
    }

    pub async fn add_attendance(
        &self,
        std_id: &str,
        body: &AttendanceBody,
    ) -> Result<(), ApiError> {
        self.post(&format!("/attendance/add/{}", std_id), body).await
    }

    pub async fn update_attendance(
        &self,
        att_id: i64,
        body: &AttendanceBody,
    ) -> Result<(), ApiError> {
        self.put(&format!("/attendance/update/{}", att_id), body)
            .await
    }

    /// Dispatch one planned attendance operation to its endpoint.
    pub async fn apply_attendance(
        &self,
        op: Operation<AttendanceUpsert>,
    ) -> Result<(), ApiError> {
        match op {
            Operation::Create(upsert) => self.add_attendance(&upsert.std_id, &upsert.body).await,
            Operation::Update(att_id, upsert) => {
                self.update_attendance(att_id, &upsert.body).await
            }
        }
    }

    // ------------------------------------------------------------------
    // Fees
    // ------------------------------------------------------------------

    pub async fn list_fees(&self) -> Result<Vec<Fee>, ApiError> {
        self.get("/fees/all").await
    }

    pub async fn apply_fee(&self, op: Operation<FeeBody>) -> Result<(), ApiError> {
        match op {
            Operation::Create(body) => self.post("/fees/add", &body).await,
            Operation::Update(fees_id, body) => {
                self.put(&format!("/fees/update/{}", fees_id), &body).await
            }
        }
    }

    pub async fn delete_fee(&self, fees_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/fees/delete/{}", fees_id)).await
    }

    // ------------------------------------------------------------------
    // Reports
    // ------------------------------------------------------------------

    pub async fn list_reports(&self) -> Result<Vec<Report>, ApiError> {
        self.get("/report/all").await
    }

    pub async fn apply_report(&self, op: Operation<ReportBody>) -> Result<(), ApiError> {
        match op {
            Operation::Create(body) => self.post("/report/add", &body).await,
            Operation::Update(rep_id, body) => {
                self.put(&format!("/report/update/{}", rep_id), &body).await
            }
        }
    }

    pub async fn delete_report(&self, rep_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/report/delete/{}", rep_id)).await
    }
}
