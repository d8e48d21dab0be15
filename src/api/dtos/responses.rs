use crate::domain::models::communication::DeliveryResult;
use crate::domain::services::{dispatch::DispatchReport, guest_batch::{BatchProgress, BatchReport, EventBatchResult}};
use serde::Serialize;

/// `{ success, message, data }` envelope shared by the JSON endpoints.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, message: None, data }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self { success: true, message: Some(message.into()), data }
    }
}

#[derive(Serialize)]
pub struct BulkAddResponse {
    pub success: bool,
    pub message: String,
    pub total_added: usize,
    pub total_skipped: usize,
    pub results: Vec<EventBatchResult>,
    pub progress: Option<BatchProgress>,
    /// One entry per event processed, in request order.
    pub steps: Vec<BatchProgress>,
    /// Rows the parser rejected, as `"Row N: reason"`.
    pub parse_errors: Vec<String>,
}

impl BulkAddResponse {
    pub fn rejected(message: impl Into<String>, parse_errors: Vec<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            total_added: 0,
            total_skipped: 0,
            results: Vec::new(),
            progress: None,
            steps: Vec::new(),
            parse_errors,
        }
    }

    pub fn from_report(report: BatchReport, steps: Vec<BatchProgress>, parse_errors: Vec<String>) -> Self {
        let mut message = report.summary();
        if !parse_errors.is_empty() {
            message.push_str(&format!("; {} row(s) rejected", parse_errors.len()));
        }
        Self {
            success: report.failed_events() == 0,
            message,
            total_added: report.total_added(),
            total_skipped: report.total_skipped(),
            progress: Some(report.progress),
            steps,
            results: report.results,
            parse_errors,
        }
    }
}

#[derive(Serialize)]
pub struct DispatchResponse {
    pub success: bool,
    pub message: String,
    pub recipient_count: usize,
    pub success_count: usize,
    pub results: Vec<DeliveryResult>,
    pub communication_id: Option<String>,
}

impl From<DispatchReport> for DispatchResponse {
    fn from(report: DispatchReport) -> Self {
        Self {
            success: report.success_count > 0,
            message: report.summary(),
            recipient_count: report.recipient_count,
            success_count: report.success_count,
            communication_id: report.record.map(|r| r.id),
            results: report.results,
        }
    }
}
