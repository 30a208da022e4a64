// ============================================================================
// VIEW STATE - Única fuente de verdad para la capa de presentación
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::ReportError;
use crate::models::{Coordinates, Report, ReportDraft};

/// Filtro por estado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Only(String),
}

impl StatusFilter {
    /// "all" (o vacío) → All, cualquier otro valor → Only
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "all" => StatusFilter::All,
            status => StatusFilter::Only(status.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status,
        }
    }

    pub fn matches(&self, report: &Report) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => report.status == *status,
        }
    }

    /// Vista derivada: subsecuencia en el mismo orden
    pub fn apply(&self, reports: &[Report]) -> Vec<Report> {
        reports.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

impl Default for StatusFilter {
    fn default() -> Self {
        StatusFilter::All
    }
}

/// Máquina de estados del modal de creación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateFlow {
    Closed,
    LoginPrompt,
    Editing,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Aviso descartable para el usuario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Condición de error (fetch_failed, write_failed...) si aplica
    pub condition: Option<&'static str>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            condition: None,
            created_at: Utc::now(),
        }
    }

    pub fn error(error: &ReportError) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: error.to_string(),
            condition: Some(error.kind()),
            created_at: Utc::now(),
        }
    }
}

/// Estado de la vista (propiedad exclusiva del ViewModel)
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Conjunto dibujable del último fetch exitoso
    pub reports: Vec<Report>,
    /// Respuesta cruda del último fetch exitoso (diagnóstico)
    pub raw_reports: Vec<Value>,
    pub status_filter: StatusFilter,
    pub is_loading: bool,
    pub create_flow: CreateFlow,
    pub draft: ReportDraft,
    pub notification: Option<Notification>,
    pub user_location: Option<Coordinates>,
    /// Generación del último fetch emitido
    pub fetch_generation: u64,
}

impl ViewState {
    pub fn new(default_status: &str) -> Self {
        Self {
            reports: Vec::new(),
            raw_reports: Vec::new(),
            status_filter: StatusFilter::All,
            is_loading: false,
            create_flow: CreateFlow::Closed,
            draft: ReportDraft::new(default_status),
            notification: None,
            user_location: None,
            fetch_generation: 0,
        }
    }

    pub fn visible_reports(&self) -> Vec<Report> {
        self.status_filter.apply(&self.reports)
    }

    pub fn is_login_visible(&self) -> bool {
        self.create_flow == CreateFlow::LoginPrompt
    }

    pub fn is_create_visible(&self) -> bool {
        matches!(self.create_flow, CreateFlow::Editing | CreateFlow::Submitting)
    }

    pub fn is_submitting(&self) -> bool {
        self.create_flow == CreateFlow::Submitting
    }
}
