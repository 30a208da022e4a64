// ============================================================================
// MAP VIEWMODEL - Preparación de datos para el mapa
// ============================================================================
// SOLO lógica de preparación de datos - Sin estado
// ============================================================================

use serde::Serialize;

use crate::config::MapConfig;
use crate::models::{Coordinates, Report};

const FALLBACK_COLOR: &str = "#8e8e93";

/// Marcador listo para el mapa
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: String,
    pub color: &'static str,
}

/// Región visible (centro + deltas)
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// ViewModel del mapa - SOLO lógica de negocio
pub struct MapViewModel;

impl MapViewModel {
    /// Color del pin según estado
    pub fn status_color(status: &str) -> &'static str {
        match status {
            "open" => "#ff3b30",
            "in_progress" => "#ff9500",
            "resolved" => "#34c759",
            _ => FALLBACK_COLOR,
        }
    }

    /// Un marcador por reporte dibujable
    pub fn prepare_markers(reports: &[Report]) -> Vec<MapMarker> {
        let markers: Vec<MapMarker> = reports
            .iter()
            .filter_map(|report| {
                let coords = report.coordinates()?;
                Some(MapMarker {
                    id: report.id.clone(),
                    title: report.title.clone(),
                    latitude: coords.latitude,
                    longitude: coords.longitude,
                    status: report.status.clone(),
                    color: Self::status_color(&report.status),
                })
            })
            .collect();

        log::debug!("📍 Preparados {} marcadores (de {} reportes)", markers.len(), reports.len());
        markers
    }

    /// Región inicial (centro configurado)
    pub fn initial_region(config: &MapConfig) -> MapRegion {
        MapRegion {
            latitude: config.default_center_lat,
            longitude: config.default_center_lng,
            latitude_delta: config.latitude_delta,
            longitude_delta: config.longitude_delta,
        }
    }

    /// Región centrada en la ubicación del usuario
    pub fn region_around(coords: Coordinates, config: &MapConfig) -> MapRegion {
        MapRegion {
            latitude: coords.latitude,
            longitude: coords.longitude,
            latitude_delta: config.latitude_delta,
            longitude_delta: config.longitude_delta,
        }
    }

    /// Región a mostrar: usuario si hay ubicación, si no la inicial
    pub fn current_region(user_location: Option<Coordinates>, config: &MapConfig) -> MapRegion {
        match user_location {
            Some(coords) if coords.is_finite() => Self::region_around(coords, config),
            _ => Self::initial_region(config),
        }
    }
}
