// ============================================================================
// LOCATION SERVICE - navigator.geolocation (solo wasm32)
// ============================================================================
// El permiso se consulta con navigator.permissions; si el navegador no lo
// expone, se asume que getCurrentPosition mostrará su propio prompt.
//
// Toda consulta termina: timeout de PositionOptions para la lectura y un
// Timeout propio que además cubre el prompt de permiso sin responder.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{PermissionState, PermissionStatus, PositionOptions};

use crate::error::{ReportError, ReportResult};
use crate::models::Coordinates;
use crate::services::traits::{LocationPermission, LocationProvider};

const PERMISSION_DENIED: u32 = 1;
const TIMEOUT: u32 = 3;

// Margen para que el usuario conteste el prompt (no cuenta en PositionOptions)
const PROMPT_GRACE_MS: u32 = 60_000;

type PositionResult = Result<Coordinates, (u32, String)>;
type PositionSender = Rc<RefCell<Option<oneshot::Sender<PositionResult>>>>;

pub struct BrowserLocation {
    timeout_ms: u32,
}

impl BrowserLocation {
    pub fn new(timeout_seconds: u32) -> Self {
        Self {
            timeout_ms: timeout_seconds.saturating_mul(1000),
        }
    }

    fn geolocation() -> Option<web_sys::Geolocation> {
        web_sys::window()?.navigator().geolocation().ok()
    }

    /// Estado real del permiso; None si la Permissions API no está disponible
    async fn query_permission() -> Option<PermissionState> {
        let permissions = web_sys::window()?.navigator().permissions().ok()?;

        let descriptor = js_sys::Object::new();
        js_sys::Reflect::set(
            &descriptor,
            &JsValue::from_str("name"),
            &JsValue::from_str("geolocation"),
        )
        .ok()?;

        let promise = permissions.query(&descriptor).ok()?;
        let status: PermissionStatus = JsFuture::from(promise).await.ok()?.dyn_into().ok()?;
        Some(status.state())
    }
}

fn read_f64(target: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(target, &JsValue::from_str(key)).ok()?.as_f64()
}

fn send(sender: &PositionSender, result: PositionResult) {
    if let Some(tx) = sender.borrow_mut().take() {
        let _ = tx.send(result);
    }
}

#[async_trait(?Send)]
impl LocationProvider for BrowserLocation {
    async fn request_permission(&self) -> LocationPermission {
        if Self::geolocation().is_none() {
            log::warn!("📵 Geolocalización no disponible en este navegador");
            return LocationPermission::Denied;
        }

        match Self::query_permission().await {
            Some(PermissionState::Denied) => {
                log::info!("📵 Permiso de ubicación denegado");
                LocationPermission::Denied
            }
            // Prompt: el navegador lo muestra al consultar la posición
            Some(_) => LocationPermission::Granted,
            None => {
                log::debug!("Permissions API no disponible, se delega en el prompt");
                LocationPermission::Granted
            }
        }
    }

    async fn current_position(&self) -> ReportResult<Coordinates> {
        let geolocation = Self::geolocation().ok_or_else(|| {
            ReportError::LocationUnavailable("Geolocalización no disponible".to_string())
        })?;

        let (tx, rx) = oneshot::channel();
        let sender: PositionSender = Rc::new(RefCell::new(Some(tx)));

        let on_success = Closure::once({
            let sender = sender.clone();
            move |position: JsValue| {
                let coords = js_sys::Reflect::get(&position, &JsValue::from_str("coords"))
                    .unwrap_or(JsValue::UNDEFINED);
                let result = match (read_f64(&coords, "latitude"), read_f64(&coords, "longitude")) {
                    (Some(lat), Some(lng)) => Ok(Coordinates::new(lat, lng)),
                    _ => Err((0, "Posición sin coordenadas".to_string())),
                };
                send(&sender, result);
            }
        });

        let on_error = Closure::once({
            let sender = sender.clone();
            move |error: JsValue| {
                let code = read_f64(&error, "code").unwrap_or(0.0) as u32;
                let message = js_sys::Reflect::get(&error, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
                    .unwrap_or_else(|| "Error de geolocalización".to_string());
                send(&sender, Err((code, message)));
            }
        });

        let options = PositionOptions::new();
        options.set_timeout(self.timeout_ms);

        geolocation
            .get_current_position_with_error_callback_and_options(
                on_success.as_ref().unchecked_ref(),
                Some(on_error.as_ref().unchecked_ref()),
                &options,
            )
            .map_err(|e| ReportError::LocationUnavailable(format!("{:?}", e)))?;

        let deadline = Timeout::new(self.timeout_ms.saturating_add(PROMPT_GRACE_MS), {
            let sender = sender.clone();
            move || send(&sender, Err((TIMEOUT, "Sin respuesta del navegador".to_string())))
        });

        // Los closures deben vivir hasta que el navegador responda
        let result = rx.await;
        drop(deadline);
        if matches!(result, Ok(Err((TIMEOUT, _)))) {
            // El navegador aún puede invocarlos tarde
            on_success.forget();
            on_error.forget();
        }

        match result {
            Ok(Ok(coords)) => {
                log::info!("📍 Ubicación obtenida: ({}, {})", coords.latitude, coords.longitude);
                Ok(coords)
            }
            Ok(Err((code, message))) => {
                match code {
                    PERMISSION_DENIED => log::info!("📵 El usuario negó la ubicación"),
                    TIMEOUT => log::warn!("⏱️ Tiempo de espera de ubicación agotado"),
                    _ => log::warn!("⚠️ Error de geolocalización ({}): {}", code, message),
                }
                Err(ReportError::LocationUnavailable(message))
            }
            Err(_) => Err(ReportError::LocationUnavailable(
                "Consulta de ubicación cancelada".to_string(),
            )),
        }
    }
}
