// ============================================================================
// REPORT - Modelo de reporte geolocalizado
// ============================================================================
// El backend devuelve JSON "flojo" (ids numéricos, coordenadas como string),
// así que se parsea desde serde_json::Value y se normaliza aquí.
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Coordenadas geográficas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Ambas coordenadas son números finitos
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Reporte normalizado (id como string, coordenadas numéricas)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    #[serde(rename = "createdBy")]
    pub created_by: Option<String>,
}

impl Report {
    /// Normaliza una entrada cruda del backend.
    /// Las coordenadas inválidas quedan como NaN: usar `is_renderable`.
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: coerce_id(raw.get("id")),
            title: coerce_text(raw.get("title")).unwrap_or_default(),
            description: coerce_text(raw.get("description")),
            latitude: coerce_number(raw.get("latitude")),
            longitude: coerce_number(raw.get("longitude")),
            status: coerce_text(raw.get("status")).unwrap_or_default(),
            created_by: coerce_text(raw.get("createdBy"))
                .or_else(|| coerce_text(raw.get("created_by"))),
        }
    }

    /// Un reporte solo se dibuja si ambas coordenadas son finitas
    pub fn is_renderable(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        if self.is_renderable() {
            Some(Coordinates::new(self.latitude, self.longitude))
        } else {
            None
        }
    }
}

/// Resultado de un GET /reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedReports {
    /// Entradas tal cual llegaron (para diagnóstico / reintento)
    pub raw: Vec<Value>,
    /// Subconjunto dibujable, en el orden del backend
    pub renderable: Vec<Report>,
    /// Entradas descartadas por coordenadas inválidas
    pub rejected: usize,
}

impl FetchedReports {
    /// Construye el resultado a partir del cuerpo de la respuesta.
    /// Un cuerpo que no es array se trata como colección vacía.
    pub fn from_body(body: Value) -> Self {
        let raw = match body {
            Value::Array(items) => items,
            other => {
                log::warn!("⚠️ Respuesta de reportes no es un array: {}", type_name(&other));
                Vec::new()
            }
        };

        let mut renderable = Vec::with_capacity(raw.len());
        let mut rejected = 0;
        for entry in &raw {
            let report = Report::from_raw(entry);
            if report.is_renderable() {
                renderable.push(report);
            } else {
                log::debug!("📍 Reporte {} descartado: coordenadas inválidas", report.id);
                rejected += 1;
            }
        }

        Self {
            raw,
            renderable,
            rejected,
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// id → string: strings tal cual, números y booleanos con su forma textual
pub fn coerce_id(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Coordenada → f64. Todo lo que no sea número o string numérico es NaN.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n,
        _ => f64::NAN,
    }
}

fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// CATÁLOGO DE ESTADOS
// ============================================================================

/// Conjunto de estados conocidos. El primero es el estado por defecto.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCatalog {
    statuses: Vec<String>,
}

impl StatusCatalog {
    /// Variante TrashMap: open / in_progress / resolved
    pub fn trashmap() -> Self {
        Self::from_slice(&["open", "in_progress", "resolved"])
    }

    /// Variante PresaWatch: open / closed
    pub fn presawatch() -> Self {
        Self::from_slice(&["open", "closed"])
    }

    fn from_slice(statuses: &[&str]) -> Self {
        Self {
            statuses: statuses.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Parsea una lista separada por comas ("open,closed").
    /// Devuelve None si no queda ningún estado.
    pub fn parse(list: &str) -> Option<Self> {
        let mut statuses: Vec<String> = Vec::new();
        for status in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !statuses.iter().any(|s| s == status) {
                statuses.push(status.to_string());
            }
        }

        if statuses.is_empty() {
            None
        } else {
            Some(Self { statuses })
        }
    }

    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    pub fn contains(&self, status: &str) -> bool {
        self.statuses.iter().any(|s| s == status)
    }

    pub fn default_status(&self) -> &str {
        // parse() y los presets garantizan al menos un estado
        self.statuses.first().map(String::as_str).unwrap_or("open")
    }
}

impl Default for StatusCatalog {
    fn default() -> Self {
        Self::trashmap()
    }
}

// ============================================================================
// BORRADOR Y REQUEST DE CREACIÓN
// ============================================================================

/// Formulario de nuevo reporte (sin guardar)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub status: String,
}

impl ReportDraft {
    pub fn new(status: &str) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status: status.to_string(),
        }
    }

    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }

    pub fn has_title(&self) -> bool {
        !self.trimmed_title().is_empty()
    }
}

/// Cuerpo del POST /reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReportRequest {
    pub title: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
}

impl NewReportRequest {
    /// La ubicación siempre es la del dispositivo, nunca la del borrador
    pub fn from_draft(draft: &ReportDraft, location: Coordinates) -> Self {
        Self {
            title: draft.trimmed_title().to_string(),
            description: draft.description.trim().to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            status: draft.status.clone(),
        }
    }
}
