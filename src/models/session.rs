use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sesión autenticada (la gestiona el proveedor de identidad)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Token de sesión emitido por el proveedor
    #[serde(skip_serializing)]
    pub id_token: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Nombre a mostrar: displayName, email o uid
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Credencial federada externa (p. ej. id_token de Google)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FederatedCredential {
    pub provider_id: String,
    pub id_token: String,
}

impl FederatedCredential {
    pub fn google(id_token: impl Into<String>) -> Self {
        Self {
            provider_id: "google.com".to_string(),
            id_token: id_token.into(),
        }
    }
}

/// Transiciones de sesión observables
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
}
