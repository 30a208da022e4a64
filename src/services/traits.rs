// ============================================================================
// COLABORADORES EXTERNOS - Traits comunes para todas las plataformas
// ============================================================================
// Un solo hilo (event loop del navegador): los futures no son Send.
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ReportResult;
use crate::models::{Coordinates, FederatedCredential, NewReportRequest, Session};

/// API remota de reportes (solo HTTP, sin lógica)
#[async_trait(?Send)]
pub trait ReportsApi {
    /// GET /reports → cuerpo JSON sin normalizar
    async fn list_reports(&self) -> ReportResult<Value>;

    /// POST /reports, opcionalmente con token Bearer
    async fn create_report(
        &self,
        request: &NewReportRequest,
        bearer_token: Option<&str>,
    ) -> ReportResult<Value>;
}

/// Estado del permiso de ubicación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPermission {
    Granted,
    Denied,
}

/// Ubicación del dispositivo
#[async_trait(?Send)]
pub trait LocationProvider {
    /// Solicitud única de permiso
    async fn request_permission(&self) -> LocationPermission;

    /// Posición actual (consulta única)
    async fn current_position(&self) -> ReportResult<Coordinates>;
}

/// Proveedor de identidad federada
#[async_trait(?Send)]
pub trait IdentityProvider {
    /// Intercambia una credencial externa por una sesión
    async fn sign_in_with_credential(&self, credential: &FederatedCredential) -> ReportResult<Session>;

    async fn sign_out(&self) -> ReportResult<()>;
}
