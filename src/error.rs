// ============================================================================
// ERRORES - Taxonomía de fallos de los colaboradores
// ============================================================================
// Ningún error llega a la vista como pánico: el ViewModel los convierte en
// notificaciones descartables.
// ============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// GET de reportes falló (red o HTTP no 2xx)
    #[error("No se pudieron cargar los reportes: {0}")]
    FetchFailed(String),

    /// POST de reporte falló (red o HTTP no 2xx)
    #[error("No se pudo enviar el reporte: {0}")]
    WriteFailed(String),

    /// Borrador inválido (título vacío)
    #[error("Reporte inválido: {0}")]
    ValidationFailed(String),

    /// Permiso denegado o ubicación no disponible
    #[error("Ubicación no disponible: {0}")]
    LocationUnavailable(String),

    /// Intercambio de credencial rechazado
    #[error("Error de autenticación: {0}")]
    AuthFailed(String),
}

impl ReportError {
    /// Nombre corto de la condición (para logs y para el puente JS)
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::FetchFailed(_) => "fetch_failed",
            ReportError::WriteFailed(_) => "write_failed",
            ReportError::ValidationFailed(_) => "validation_failed",
            ReportError::LocationUnavailable(_) => "location_unavailable",
            ReportError::AuthFailed(_) => "auth_failed",
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
