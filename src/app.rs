// ============================================================================
// APP - Composición con colaboradores del navegador + puente JS
// ============================================================================
// La vista (mapa, modales) vive en JavaScript: llama a estas funciones y
// vuelve a pintar al recibir el evento "trashmap:changed".
// ============================================================================

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::CONFIG;
use crate::models::{FederatedCredential, Report, ReportDraft};
use crate::services::{ApiClient, BrowserLocation, FirebaseIdentity};
use crate::state::{CreateFlow, Notification, SessionState, StatusFilter};
use crate::viewmodels::{MapMarker, MapRegion, MapViewModel, ReportViewModel};

const CHANGED_EVENT: &str = "trashmap:changed";

type BrowserViewModel = ReportViewModel<ApiClient, BrowserLocation, FirebaseIdentity>;

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

pub struct App {
    view_model: BrowserViewModel,
}

impl App {
    pub fn new() -> Self {
        let view_model = ReportViewModel::new(
            Rc::new(ApiClient::new()),
            Rc::new(BrowserLocation::new(CONFIG.location_timeout_seconds)),
            Rc::new(FirebaseIdentity::new(CONFIG.identity_config.clone())),
            SessionState::new(),
            &CONFIG,
        );
        Self { view_model }
    }

    pub fn view_model(&self) -> BrowserViewModel {
        self.view_model.clone()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let state = self.view_model.state();
        let visible = state.visible_reports();
        ViewSnapshot {
            markers: MapViewModel::prepare_markers(&visible),
            region: MapViewModel::current_region(state.user_location, &CONFIG.map_config),
            reports: visible,
            filter: state.status_filter.as_str().to_string(),
            statuses: self.view_model.statuses().statuses().to_vec(),
            is_loading: state.is_loading,
            create_flow: state.create_flow,
            login_visible: state.is_login_visible(),
            create_visible: state.is_create_visible(),
            draft: state.draft.clone(),
            notification: state.notification.clone(),
            user: self.view_model.session().current().map(|s| s.label().to_string()),
            raw_count: state.raw_reports.len(),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Lo que la vista JS necesita para pintar
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub reports: Vec<Report>,
    pub markers: Vec<MapMarker>,
    pub region: MapRegion,
    pub filter: String,
    pub statuses: Vec<String>,
    pub is_loading: bool,
    pub create_flow: CreateFlow,
    pub login_visible: bool,
    pub create_visible: bool,
    pub draft: ReportDraft,
    pub notification: Option<Notification>,
    pub user: Option<String>,
    pub raw_count: usize,
}

/// Crear la app y lanzar el arranque (ubicación + primer fetch)
pub fn mount() {
    let view_model = APP.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_some() {
            log::warn!("⚠️ App ya montada, ignorando");
            return None;
        }
        let app = App::new();
        let view_model = app.view_model();
        *slot = Some(app);
        Some(view_model)
    });

    if let Some(view_model) = view_model {
        spawn(async move {
            view_model.start().await;
        });
    }
}

fn with_view_model() -> Option<BrowserViewModel> {
    let view_model = APP.with(|cell| cell.borrow().as_ref().map(App::view_model));
    if view_model.is_none() {
        log::warn!("⚠️ App no está inicializada");
    }
    view_model
}

/// Ejecuta la acción y avisa a la vista al terminar
fn spawn<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    notify_changed();
    wasm_bindgen_futures::spawn_local(async move {
        future.await;
        notify_changed();
    });
}

fn notify_changed() {
    let Some(window) = web_sys::window() else {
        return;
    };
    match web_sys::Event::new(CHANGED_EVENT) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(e) => log::error!("❌ Error creando evento {}: {:?}", CHANGED_EVENT, e),
    }
}

// ============================================================================
// FUNCIONES EXPUESTAS A JAVASCRIPT
// ============================================================================

#[wasm_bindgen]
pub fn view_snapshot() -> String {
    APP.with(|cell| {
        cell.borrow()
            .as_ref()
            .and_then(|app| serde_json::to_string(&app.snapshot()).ok())
            .unwrap_or_else(|| "null".to_string())
    })
}

#[wasm_bindgen]
pub fn refresh_reports() {
    if let Some(view_model) = with_view_model() {
        spawn(async move {
            view_model.refresh().await;
        });
    }
}

#[wasm_bindgen]
pub fn set_status_filter(filter: &str) {
    if let Some(view_model) = with_view_model() {
        view_model.set_filter(StatusFilter::parse(filter));
        notify_changed();
    }
}

#[wasm_bindgen]
pub fn open_create_report() {
    if let Some(view_model) = with_view_model() {
        view_model.open_create();
        notify_changed();
    }
}

#[wasm_bindgen]
pub fn close_create_report() {
    if let Some(view_model) = with_view_model() {
        view_model.close_create();
        notify_changed();
    }
}

#[wasm_bindgen]
pub fn close_login() {
    if let Some(view_model) = with_view_model() {
        view_model.close_login();
        notify_changed();
    }
}

#[wasm_bindgen]
pub fn set_draft(title: &str, description: &str, status: &str) {
    if let Some(view_model) = with_view_model() {
        view_model.set_draft_title(title);
        view_model.set_draft_description(description);
        if !status.is_empty() {
            view_model.set_draft_status(status);
        }
        notify_changed();
    }
}

#[wasm_bindgen]
pub fn submit_report() {
    if let Some(view_model) = with_view_model() {
        spawn(async move {
            view_model.submit_create().await;
        });
    }
}

#[wasm_bindgen]
pub fn sign_in_with_google(id_token: String) {
    if let Some(view_model) = with_view_model() {
        spawn(async move {
            let _ = view_model.sign_in(&FederatedCredential::google(id_token)).await;
        });
    }
}

#[wasm_bindgen]
pub fn sign_out() {
    if let Some(view_model) = with_view_model() {
        spawn(async move {
            let _ = view_model.sign_out().await;
        });
    }
}

#[wasm_bindgen]
pub fn dismiss_notification() {
    if let Some(view_model) = with_view_model() {
        view_model.dismiss_notification();
        notify_changed();
    }
}

/// Desmontar: las respuestas pendientes ya no tocan el estado
#[wasm_bindgen]
pub fn unmount() {
    let app = APP.with(|cell| cell.borrow_mut().take());
    if let Some(app) = app {
        app.view_model.teardown();
    }
}
