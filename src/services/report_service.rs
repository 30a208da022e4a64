// ============================================================================
// REPORT SERVICE - Cliente del almacén de reportes
// ============================================================================
// Lectura completa (sin paginación ni caché) y escritura validada.
// Tras un create exitoso el llamador debe volver a leer: no hay inserción
// optimista.
// ============================================================================

use std::rc::Rc;

use crate::error::{ReportError, ReportResult};
use crate::models::{FetchedReports, NewReportRequest, ReportDraft, Session};
use crate::services::traits::{LocationPermission, LocationProvider, ReportsApi};

pub struct ReportService<A> {
    api: Rc<A>,
    attach_session_token: bool,
}

impl<A> Clone for ReportService<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            attach_session_token: self.attach_session_token,
        }
    }
}

impl<A: ReportsApi> ReportService<A> {
    pub fn new(api: Rc<A>, attach_session_token: bool) -> Self {
        Self {
            api,
            attach_session_token,
        }
    }

    /// Obtener la colección completa y normalizarla
    pub async fn fetch_reports(&self) -> ReportResult<FetchedReports> {
        log::info!("📥 Obteniendo reportes...");

        let body = self.api.list_reports().await.map_err(|e| match e {
            ReportError::FetchFailed(msg) => ReportError::FetchFailed(msg),
            other => ReportError::FetchFailed(other.to_string()),
        })?;

        let fetched = FetchedReports::from_body(body);
        log::info!(
            "✅ Reportes obtenidos: {} dibujables / {} recibidos",
            fetched.renderable.len(),
            fetched.raw.len()
        );
        Ok(fetched)
    }

    /// Crear un reporte en la ubicación actual del dispositivo.
    /// Valida y resuelve la ubicación antes de cualquier llamada de red.
    pub async fn create_report<L: LocationProvider + ?Sized>(
        &self,
        draft: &ReportDraft,
        location: &L,
        session: Option<&Session>,
    ) -> ReportResult<()> {
        if !draft.has_title() {
            log::warn!("⚠️ Reporte sin título, no se envía");
            return Err(ReportError::ValidationFailed(
                "El título es obligatorio".to_string(),
            ));
        }

        if location.request_permission().await == LocationPermission::Denied {
            log::warn!("📵 Permiso de ubicación denegado");
            return Err(ReportError::LocationUnavailable(
                "Permiso de ubicación denegado".to_string(),
            ));
        }

        let coords = location.current_position().await.map_err(|e| match e {
            ReportError::LocationUnavailable(msg) => ReportError::LocationUnavailable(msg),
            other => ReportError::LocationUnavailable(other.to_string()),
        })?;
        if !coords.is_finite() {
            return Err(ReportError::LocationUnavailable(
                "Ubicación inválida".to_string(),
            ));
        }

        let request = NewReportRequest::from_draft(draft, coords);
        let token = if self.attach_session_token {
            session.map(|s| s.id_token.as_str())
        } else {
            None
        };

        log::info!(
            "📤 Enviando reporte '{}' en ({}, {})",
            request.title,
            request.latitude,
            request.longitude
        );

        self.api
            .create_report(&request, token)
            .await
            .map_err(|e| match e {
                ReportError::WriteFailed(msg) => ReportError::WriteFailed(msg),
                other => ReportError::WriteFailed(other.to_string()),
            })?;

        log::info!("✅ Reporte creado");
        Ok(())
    }
}
