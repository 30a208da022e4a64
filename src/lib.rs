// ============================================================================
// TRASHMAP - NÚCLEO DEL CLIENTE (RUST PURO)
// ============================================================================
// - Models: Reportes, sesión (compartidos con el backend)
// - Services: SOLO comunicación con colaboradores (API, ubicación, identidad)
// - State: ViewState + canal de sesión con Rc<RefCell>
// - ViewModels: Máquina de estados de la vista + preparación del mapa
// - App (wasm32): composición con el navegador + puente JS
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod viewmodels;

#[cfg(target_arch = "wasm32")]
mod app;

#[cfg(test)]
mod testing;

pub use error::{ReportError, ReportResult};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Inicializar panic hook para mejor debugging
    console_error_panic_hook::set_once();

    if config::CONFIG.is_logging_enabled() {
        wasm_logger::init(wasm_logger::Config::default());
    }
    log::info!("🚀 TrashMap - API: {}", config::CONFIG.api_base_url);

    app::mount();
    Ok(())
}
