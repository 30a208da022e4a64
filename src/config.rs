use serde::{Deserialize, Serialize};

use crate::models::StatusCatalog;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub environment: String,
    pub enable_logging: bool,
    /// Adjuntar el token de sesión al POST /reports
    pub attach_session_token: bool,
    /// Límite de la consulta de ubicación
    pub location_timeout_seconds: u32,
    pub statuses: StatusCatalog,
    pub map_config: MapConfig,
    pub identity_config: IdentityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://trashmap-api-presamordor-e0csfsedadffd9ey.canadacentral-01.azurewebsites.net"
                .to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            attach_session_token: false,
            location_timeout_seconds: 15,
            statuses: StatusCatalog::default(),
            map_config: MapConfig::default(),
            identity_config: IdentityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center_lat: 19.4326,
            default_center_lng: -99.1332,
            latitude_delta: 0.05,
            longitude_delta: 0.05,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub firebase_api_key: String,
    pub identity_toolkit_url: String,
    /// requestUri que exige signInWithIdp (no se usa para redirecciones)
    pub request_uri: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            firebase_api_key: String::new(),
            identity_toolkit_url: "https://identitytoolkit.googleapis.com/v1".to_string(),
            request_uri: "http://localhost".to_string(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            environment: option_env!("ENVIRONMENT")
                .unwrap_or("development").to_string(),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true").parse().unwrap_or(true),
            attach_session_token: option_env!("ATTACH_SESSION_TOKEN")
                .unwrap_or("false").parse().unwrap_or(false),
            location_timeout_seconds: option_env!("LOCATION_TIMEOUT_SECONDS")
                .unwrap_or("15").parse().unwrap_or(15),
            statuses: option_env!("REPORT_STATUSES")
                .and_then(StatusCatalog::parse)
                .unwrap_or_default(),
            map_config: MapConfig {
                default_center_lat: option_env!("DEFAULT_MAP_CENTER_LAT")
                    .unwrap_or("19.4326").parse().unwrap_or(19.4326),
                default_center_lng: option_env!("DEFAULT_MAP_CENTER_LNG")
                    .unwrap_or("-99.1332").parse().unwrap_or(-99.1332),
                latitude_delta: option_env!("MAP_LATITUDE_DELTA")
                    .unwrap_or("0.05").parse().unwrap_or(0.05),
                longitude_delta: option_env!("MAP_LONGITUDE_DELTA")
                    .unwrap_or("0.05").parse().unwrap_or(0.05),
            },
            identity_config: IdentityConfig {
                firebase_api_key: option_env!("FIREBASE_API_KEY")
                    .unwrap_or("").to_string(),
                identity_toolkit_url: option_env!("IDENTITY_TOOLKIT_URL")
                    .unwrap_or("https://identitytoolkit.googleapis.com/v1").to_string(),
                request_uri: option_env!("IDENTITY_REQUEST_URI")
                    .unwrap_or("http://localhost").to_string(),
            },
        }
    }

    /// URL completa de la colección de reportes
    pub fn reports_url(&self) -> String {
        format!("{}/reports", self.api_base_url)
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
