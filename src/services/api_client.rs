// ============================================================================
// API CLIENT - SOLO COMUNICACIÓN HTTP (Stateless)
// ============================================================================
// NO tiene lógica de negocio, solo hace requests HTTP
// ============================================================================

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;

use crate::config::CONFIG;
use crate::error::{ReportError, ReportResult};
use crate::models::NewReportRequest;
use crate::services::traits::ReportsApi;

/// Cliente API - SOLO comunicación HTTP (stateless)
#[derive(Clone)]
pub struct ApiClient {
    reports_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            reports_url: CONFIG.reports_url(),
        }
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl ReportsApi for ApiClient {
    /// Listar reportes
    async fn list_reports(&self) -> ReportResult<Value> {
        let response = Request::get(&self.reports_url)
            .send()
            .await
            .map_err(|e| ReportError::FetchFailed(format!("Network error: {}", e)))?;

        if !response.ok() {
            return Err(ReportError::FetchFailed(format!(
                "HTTP {}: {}",
                response.status(),
                response.status_text()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ReportError::FetchFailed(format!("Parse error: {}", e)))
    }

    /// Crear reporte
    async fn create_report(
        &self,
        request: &NewReportRequest,
        bearer_token: Option<&str>,
    ) -> ReportResult<Value> {
        let mut builder = Request::post(&self.reports_url);
        if let Some(token) = bearer_token {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let response = builder
            .json(request)
            .map_err(|e| ReportError::WriteFailed(format!("Serialization error: {}", e)))?
            .send()
            .await
            .map_err(|e| ReportError::WriteFailed(format!("Network error: {}", e)))?;

        if !response.ok() {
            let status = response.status();
            let error_text = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReportError::WriteFailed(format!("HTTP {}: {}", status, error_text)));
        }

        // La forma del recurso creado no está garantizada: cuerpo vacío es válido
        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }
}
