//! Reporting endpoints.

use anyhow::{Context, Result};
use async_trait::async_trait;
use luit_core::models::{EncodedPayload, ReportRequest, ReportResponse, UploadedImageRef};
use luit_core::{ImageUploader, UploadError};
use serde::{Deserialize, Serialize};

use crate::{error_detail, ApiClient};

pub const UPLOAD_IMAGE_PATH: &str = "/reporting/upload-image";
pub const REPORT_PATH: &str = "/reporting/report";

#[derive(Serialize)]
struct UploadImageRequest<'a> {
    image_base_64: &'a str,
}

/// Body of a 2xx upload response. Every field is optional on the wire.
#[derive(Debug, Deserialize)]
struct UploadImageResponse {
    #[serde(default)]
    success: bool,
    url: Option<String>,
    public_id: Option<String>,
    message: Option<String>,
}

impl UploadImageResponse {
    fn into_image_ref(self, status: u16) -> Result<UploadedImageRef, UploadError> {
        if !self.success {
            return Err(UploadError::Rejected {
                status: Some(status),
                message: self.message,
            });
        }

        match (self.url, self.public_id) {
            (Some(url), Some(public_id)) if !url.is_empty() && !public_id.is_empty() => {
                Ok(UploadedImageRef { url, public_id })
            }
            _ => Err(UploadError::MalformedResponse(
                "missing url or public_id".to_string(),
            )),
        }
    }
}

impl ApiClient {
    /// Upload one base64 data-URL image. Exactly one attempt, no retry.
    pub async fn upload_image_base64(
        &self,
        payload: &EncodedPayload,
    ) -> Result<UploadedImageRef, UploadError> {
        let body = UploadImageRequest {
            image_base_64: payload.as_str(),
        };

        let response = self
            .send_json(UPLOAD_IMAGE_PATH, &body)
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Image upload rejected");
            return Err(UploadError::Rejected {
                status: Some(status.as_u16()),
                message: error_detail(&text),
            });
        }

        let parsed: UploadImageResponse = serde_json::from_str(&text)
            .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;
        let image = parsed.into_image_ref(status.as_u16())?;

        tracing::debug!(public_id = %image.public_id, "Upload response accepted");
        Ok(image)
    }

    /// Submit a contamination report after checking its required fields.
    pub async fn create_report(&self, request: &ReportRequest) -> Result<ReportResponse> {
        request
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid report: {}", e))?;

        let response: ReportResponse = self
            .post_json(REPORT_PATH, request)
            .await
            .context("Failed to submit report")?;

        if !response.success {
            anyhow::bail!(
                "Report was not accepted: {}",
                response.message.as_deref().unwrap_or("unknown reason")
            );
        }

        tracing::info!(
            report_id = ?response.report_id,
            alert_triggered = response.alert_triggered,
            "Report submitted"
        );
        Ok(response)
    }
}

#[async_trait]
impl ImageUploader for ApiClient {
    async fn upload(&self, payload: &EncodedPayload) -> Result<UploadedImageRef, UploadError> {
        self.upload_image_base64(payload).await
    }
}
