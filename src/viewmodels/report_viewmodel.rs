// ============================================================================
// REPORT VIEWMODEL - Controlador del estado de vista
// ============================================================================
// Dueño exclusivo del ViewState. Secuencia las llamadas a los colaboradores
// y convierte cada error en una notificación.
//
// - Un solo fetch "normal" en vuelo: refresh() se ignora mientras is_loading
// - El refetch posterior a un create no se ignora: abre una generación nueva
//   y las respuestas de generaciones anteriores se descartan
// - Tras teardown() ninguna continuación async toca el estado
// ============================================================================

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::config::AppConfig;
use crate::error::{ReportError, ReportResult};
use crate::models::{FederatedCredential, Report, ReportDraft, SessionEvent, StatusCatalog};
use crate::services::{
    AuthService, IdentityProvider, LocationPermission, LocationProvider, ReportService, ReportsApi,
};
use crate::state::{CreateFlow, Notification, SessionState, StatusFilter, SubscriptionId, ViewState};

/// Resultado de un refresh
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// Colección reemplazada
    Applied { count: usize },
    /// Ya había un fetch en vuelo
    Coalesced,
    /// La respuesta llegó tarde: había una generación más nueva
    Stale,
    Failed(ReportError),
    /// El ViewModel ya fue desmontado
    Detached,
}

/// Resultado de enviar el formulario
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created,
    Rejected(ReportError),
    /// El formulario no estaba abierto en modo edición (o no hay sesión)
    Ignored,
    Detached,
}

pub struct ReportViewModel<A, L, I> {
    state: Rc<RefCell<ViewState>>,
    reports: ReportService<A>,
    location: Rc<L>,
    auth: AuthService<I>,
    session: SessionState,
    statuses: StatusCatalog,
    alive: Rc<Cell<bool>>,
    subscription: Rc<Cell<Option<SubscriptionId>>>,
}

impl<A, L, I> Clone for ReportViewModel<A, L, I> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            reports: self.reports.clone(),
            location: self.location.clone(),
            auth: self.auth.clone(),
            session: self.session.clone(),
            statuses: self.statuses.clone(),
            alive: self.alive.clone(),
            subscription: self.subscription.clone(),
        }
    }
}

impl<A, L, I> ReportViewModel<A, L, I>
where
    A: ReportsApi,
    L: LocationProvider,
    I: IdentityProvider,
{
    /// Crea el ViewModel y se suscribe a los cambios de sesión
    pub fn new(
        api: Rc<A>,
        location: Rc<L>,
        identity: Rc<I>,
        session: SessionState,
        config: &AppConfig,
    ) -> Self {
        let statuses = config.statuses.clone();
        let state = Rc::new(RefCell::new(ViewState::new(statuses.default_status())));

        let subscription = {
            let state = Rc::downgrade(&state);
            session.subscribe(move |event| on_session_event(&state, event))
        };

        Self {
            state,
            reports: ReportService::new(api, config.attach_session_token),
            location,
            auth: AuthService::new(identity, session.clone()),
            session,
            statuses,
            alive: Rc::new(Cell::new(true)),
            subscription: Rc::new(Cell::new(Some(subscription))),
        }
    }

    /// Lectura para la capa de presentación
    pub fn state(&self) -> Ref<'_, ViewState> {
        self.state.borrow()
    }

    pub fn statuses(&self) -> &StatusCatalog {
        &self.statuses
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Arranque: ubicación del usuario + primer fetch
    pub async fn start(&self) -> RefreshOutcome {
        log::info!("🚀 Iniciando vista de reportes");
        let (_, outcome) = futures::join!(self.locate_user(), self.refresh());
        outcome
    }

    /// Desmontaje: cancela la suscripción y congela el estado
    pub fn teardown(&self) {
        if !self.alive.replace(false) {
            return;
        }
        if let Some(id) = self.subscription.take() {
            self.session.unsubscribe(id);
        }
        log::info!("🔌 ViewModel de reportes desmontado");
    }

    // ------------------------------------------------------------------------
    // Reportes
    // ------------------------------------------------------------------------

    /// Refresh pedido por el usuario (o al arrancar)
    pub async fn refresh(&self) -> RefreshOutcome {
        if !self.is_alive() {
            return RefreshOutcome::Detached;
        }
        if self.state.borrow().is_loading {
            log::info!("⏳ Fetch en curso, refresh ignorado");
            return RefreshOutcome::Coalesced;
        }
        self.fetch_generation().await
    }

    /// Emite un fetch con generación nueva (sin mirar is_loading)
    async fn fetch_generation(&self) -> RefreshOutcome {
        let generation = {
            let mut state = self.state.borrow_mut();
            state.fetch_generation += 1;
            state.is_loading = true;
            state.fetch_generation
        };

        let result = self.reports.fetch_reports().await;

        if !self.is_alive() {
            return RefreshOutcome::Detached;
        }

        let mut state = self.state.borrow_mut();
        if state.fetch_generation != generation {
            log::debug!(
                "🗑️ Respuesta de fetch #{} descartada (actual #{})",
                generation,
                state.fetch_generation
            );
            return RefreshOutcome::Stale;
        }

        state.is_loading = false;
        match result {
            Ok(fetched) => {
                let count = fetched.renderable.len();
                state.reports = fetched.renderable;
                state.raw_reports = fetched.raw;
                RefreshOutcome::Applied { count }
            }
            Err(e) => {
                log::error!("❌ {}", e);
                state.notification = Some(Notification::error(&e));
                RefreshOutcome::Failed(e)
            }
        }
    }

    /// Centrar en el usuario al arrancar; sin permiso no hace nada
    pub async fn locate_user(&self) {
        if self.location.request_permission().await != LocationPermission::Granted {
            log::info!("📵 Sin permiso de ubicación, se mantiene la región por defecto");
            return;
        }

        match self.location.current_position().await {
            Ok(coords) if coords.is_finite() => {
                if self.is_alive() {
                    self.state.borrow_mut().user_location = Some(coords);
                }
            }
            Ok(_) => log::warn!("⚠️ Ubicación inválida ignorada"),
            Err(e) => log::warn!("⚠️ {}", e),
        }
    }

    // ------------------------------------------------------------------------
    // Filtro
    // ------------------------------------------------------------------------

    pub fn set_filter(&self, filter: StatusFilter) {
        if let StatusFilter::Only(status) = &filter {
            if !self.statuses.contains(status) {
                log::warn!("⚠️ Filtro por estado desconocido: {}", status);
            }
        }
        self.state.borrow_mut().status_filter = filter;
    }

    pub fn visible_reports(&self) -> Vec<Report> {
        self.state.borrow().visible_reports()
    }

    // ------------------------------------------------------------------------
    // Modal de creación
    // ------------------------------------------------------------------------

    /// Abrir el formulario (pasa por la verificación de sesión)
    pub fn open_create(&self) -> CreateFlow {
        let authenticated = self.session.is_authenticated();
        let mut state = self.state.borrow_mut();

        if state.create_flow == CreateFlow::Submitting {
            return state.create_flow;
        }

        state.create_flow = if authenticated {
            CreateFlow::Editing
        } else {
            log::info!("🔒 Sin sesión: se muestra el login");
            CreateFlow::LoginPrompt
        };
        state.create_flow
    }

    /// Cerrar el formulario (el borrador se conserva)
    pub fn close_create(&self) {
        let mut state = self.state.borrow_mut();
        if state.create_flow == CreateFlow::Editing {
            state.create_flow = CreateFlow::Closed;
        }
    }

    pub fn close_login(&self) {
        let mut state = self.state.borrow_mut();
        if state.create_flow == CreateFlow::LoginPrompt {
            state.create_flow = CreateFlow::Closed;
        }
    }

    /// Editar el borrador; ignorado mientras se envía
    pub fn update_draft<F>(&self, update: F) -> bool
    where
        F: FnOnce(&mut ReportDraft),
    {
        let mut state = self.state.borrow_mut();
        if state.is_submitting() {
            return false;
        }
        update(&mut state.draft);
        true
    }

    pub fn set_draft_title(&self, title: &str) -> bool {
        self.update_draft(|d| d.title = title.to_string())
    }

    pub fn set_draft_description(&self, description: &str) -> bool {
        self.update_draft(|d| d.description = description.to_string())
    }

    /// Solo acepta estados del catálogo
    pub fn set_draft_status(&self, status: &str) -> bool {
        if !self.statuses.contains(status) {
            log::warn!("⚠️ Estado no válido para el borrador: {}", status);
            return false;
        }
        self.update_draft(|d| d.status = status.to_string())
    }

    /// Enviar el formulario: Editing → Submitting → Closed | Editing
    pub async fn submit_create(&self) -> SubmitOutcome {
        if !self.is_alive() {
            return SubmitOutcome::Detached;
        }

        let session = self.session.current();
        let draft = {
            let mut state = self.state.borrow_mut();
            if state.create_flow != CreateFlow::Editing {
                return SubmitOutcome::Ignored;
            }
            if session.is_none() {
                log::info!("🔒 Sin sesión: el envío vuelve al login");
                state.create_flow = CreateFlow::LoginPrompt;
                return SubmitOutcome::Ignored;
            }
            state.create_flow = CreateFlow::Submitting;
            state.draft.clone()
        };

        let result = self
            .reports
            .create_report(&draft, self.location.as_ref(), session.as_ref())
            .await;

        if !self.is_alive() {
            return SubmitOutcome::Detached;
        }

        match result {
            Ok(()) => {
                {
                    let mut state = self.state.borrow_mut();
                    state.create_flow = CreateFlow::Closed;
                    state.draft = ReportDraft::new(self.statuses.default_status());
                    state.notification = Some(Notification::success("Reporte enviado"));
                }
                self.fetch_generation().await;
                SubmitOutcome::Created
            }
            Err(e) => {
                log::error!("❌ {}", e);
                let authenticated = self.session.is_authenticated();
                let mut state = self.state.borrow_mut();
                // La sesión pudo cerrarse durante el envío: no se reabre el formulario
                state.create_flow = if authenticated {
                    CreateFlow::Editing
                } else {
                    CreateFlow::Closed
                };
                state.notification = Some(Notification::error(&e));
                SubmitOutcome::Rejected(e)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Sesión
    // ------------------------------------------------------------------------

    /// Login con credencial federada. El cierre del prompt lo hace el evento.
    pub async fn sign_in(&self, credential: &FederatedCredential) -> ReportResult<()> {
        let result = self.auth.sign_in(credential).await;
        if !self.is_alive() {
            return result.map(|_| ());
        }

        let mut state = self.state.borrow_mut();
        match result {
            Ok(session) => {
                state.notification = Some(Notification::success(format!(
                    "Sesión iniciada como {}",
                    session.label()
                )));
                Ok(())
            }
            Err(e) => {
                state.notification = Some(Notification::error(&e));
                Err(e)
            }
        }
    }

    pub async fn sign_out(&self) -> ReportResult<()> {
        let result = self.auth.sign_out().await;
        if let Err(e) = &result {
            if self.is_alive() {
                self.state.borrow_mut().notification = Some(Notification::error(e));
            }
        }
        result
    }

    // ------------------------------------------------------------------------
    // Notificaciones
    // ------------------------------------------------------------------------

    pub fn dismiss_notification(&self) {
        self.state.borrow_mut().notification = None;
    }
}

/// Reacción a transiciones de sesión
fn on_session_event(state: &Weak<RefCell<ViewState>>, event: &SessionEvent) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut state = state.borrow_mut();

    match event {
        SessionEvent::SignedIn(_) => {
            if state.create_flow == CreateFlow::LoginPrompt {
                state.create_flow = CreateFlow::Closed;
            }
        }
        SessionEvent::SignedOut => {
            if state.create_flow == CreateFlow::Editing {
                state.create_flow = CreateFlow::Closed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use crate::state::NotificationKind;
    use crate::testing::{FakeIdentity, FakeLocation, FakeReportsApi};
    use futures::executor::block_on;
    use serde_json::json;

    type TestViewModel = ReportViewModel<FakeReportsApi, FakeLocation, FakeIdentity>;

    struct Harness {
        api: Rc<FakeReportsApi>,
        location: Rc<FakeLocation>,
        vm: TestViewModel,
    }

    fn harness_with(location: FakeLocation) -> Harness {
        let api = Rc::new(FakeReportsApi::new());
        let location = Rc::new(location);
        let vm = ReportViewModel::new(
            api.clone(),
            location.clone(),
            Rc::new(FakeIdentity::accepting()),
            SessionState::new(),
            &AppConfig::default(),
        );
        Harness { api, location, vm }
    }

    fn harness() -> Harness {
        harness_with(FakeLocation::granted(Coordinates::new(19.4326, -99.1332)))
    }

    fn signed_in_harness() -> Harness {
        let h = harness();
        block_on(h.vm.sign_in(&FederatedCredential::google("google-token"))).unwrap();
        h
    }

    fn two_reports() -> serde_json::Value {
        json!([
            {"id": "1", "title": "Tiradero", "latitude": 19.4, "longitude": -99.1, "status": "open"},
            {"id": "2", "title": "Llantas", "latitude": "bad", "longitude": -99.2, "status": "closed"}
        ])
    }

    #[test]
    fn test_refresh_replaces_collection_with_renderable_set() {
        let h = harness();
        h.api.push_list(Ok(two_reports()));

        let outcome = block_on(h.vm.refresh());
        assert_eq!(outcome, RefreshOutcome::Applied { count: 1 });

        let state = h.vm.state();
        assert_eq!(state.reports.len(), 1);
        assert_eq!(state.reports[0].id, "1");
        assert_eq!(state.raw_reports.len(), 2);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_fetch_failure_keeps_previous_reports_and_notifies() {
        let h = harness();
        h.api.push_list(Ok(two_reports()));
        block_on(h.vm.refresh());

        h.api.push_list(Err(ReportError::FetchFailed("HTTP 500: Internal Server Error".into())));
        let outcome = block_on(h.vm.refresh());
        assert!(matches!(outcome, RefreshOutcome::Failed(ReportError::FetchFailed(_))));

        let state = h.vm.state();
        assert_eq!(state.reports.len(), 1);
        assert!(!state.is_loading);
        let notification = state.notification.as_ref().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.condition, Some("fetch_failed"));
    }

    #[test]
    fn test_overlapping_refresh_is_coalesced() {
        let h = harness();
        let release = h.api.push_gated_list(Ok(two_reports()));

        let (first, second, _) = block_on(async {
            futures::join!(h.vm.refresh(), h.vm.refresh(), async {
                release.send(()).unwrap();
            })
        });

        assert_eq!(first, RefreshOutcome::Applied { count: 1 });
        assert_eq!(second, RefreshOutcome::Coalesced);
        assert_eq!(h.api.list_calls(), 1);
    }

    #[test]
    fn test_start_locates_user_and_fetches_once() {
        let h = harness();
        h.api.push_list(Ok(two_reports()));

        let outcome = block_on(h.vm.start());
        assert_eq!(outcome, RefreshOutcome::Applied { count: 1 });
        assert_eq!(h.api.list_calls(), 1);
        assert_eq!(
            h.vm.state().user_location,
            Some(Coordinates::new(19.4326, -99.1332))
        );
    }

    #[test]
    fn test_start_without_location_permission_still_fetches() {
        let h = harness_with(FakeLocation::denied());
        block_on(h.vm.start());

        assert_eq!(h.vm.state().user_location, None);
        assert_eq!(h.location.position_calls(), 0);
        assert_eq!(h.api.list_calls(), 1);
    }

    #[test]
    fn test_filter_is_derived_from_current_collection() {
        let h = harness();
        h.api.push_list(Ok(json!([
            {"id": "1", "latitude": 1.0, "longitude": 1.0, "status": "open"},
            {"id": "2", "latitude": 1.0, "longitude": 1.0, "status": "resolved"},
            {"id": "3", "latitude": 1.0, "longitude": 1.0, "status": "open"}
        ])));
        block_on(h.vm.refresh());

        h.vm.set_filter(StatusFilter::Only("open".into()));
        let once = h.vm.visible_reports();
        h.vm.set_filter(StatusFilter::Only("open".into()));
        assert_eq!(h.vm.visible_reports(), once);
        assert_eq!(once.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["1", "3"]);

        h.vm.set_filter(StatusFilter::All);
        assert_eq!(h.vm.visible_reports(), h.vm.state().reports);
    }

    #[test]
    fn test_open_create_without_session_shows_login() {
        let h = harness();
        assert_eq!(h.vm.open_create(), CreateFlow::LoginPrompt);
        assert!(h.vm.state().is_login_visible());
    }

    #[test]
    fn test_sign_in_closes_login_prompt() {
        let h = harness();
        h.vm.open_create();

        block_on(h.vm.sign_in(&FederatedCredential::google("google-token"))).unwrap();
        let state = h.vm.state();
        assert_eq!(state.create_flow, CreateFlow::Closed);
        assert_eq!(state.notification.as_ref().unwrap().kind, NotificationKind::Success);
    }

    #[test]
    fn test_rejected_sign_in_keeps_prompt_and_notifies() {
        let api = Rc::new(FakeReportsApi::new());
        let vm = ReportViewModel::new(
            api,
            Rc::new(FakeLocation::denied()),
            Rc::new(FakeIdentity::rejecting("INVALID_IDP_RESPONSE")),
            SessionState::new(),
            &AppConfig::default(),
        );
        vm.open_create();

        let result = block_on(vm.sign_in(&FederatedCredential::google("bad")));
        assert!(matches!(result, Err(ReportError::AuthFailed(_))));
        let state = vm.state();
        assert_eq!(state.create_flow, CreateFlow::LoginPrompt);
        assert_eq!(state.notification.as_ref().unwrap().condition, Some("auth_failed"));
    }

    #[test]
    fn test_successful_submit_closes_and_refetches_once() {
        let h = signed_in_harness();
        assert_eq!(h.vm.open_create(), CreateFlow::Editing);
        h.vm.set_draft_title("Basura en el parque");
        h.api.push_list(Ok(two_reports()));

        let outcome = block_on(h.vm.submit_create());
        assert_eq!(outcome, SubmitOutcome::Created);
        assert_eq!(h.api.create_calls(), 1);
        assert_eq!(h.api.list_calls(), 1);

        let state = h.vm.state();
        assert_eq!(state.create_flow, CreateFlow::Closed);
        assert_eq!(state.draft, ReportDraft::new("open"));
        assert_eq!(state.reports.len(), 1);
        assert_eq!(state.notification.as_ref().unwrap().kind, NotificationKind::Success);
    }

    #[test]
    fn test_blank_title_is_rejected_and_draft_untouched() {
        let h = signed_in_harness();
        h.vm.open_create();
        h.vm.set_draft_title("  ");
        h.vm.set_draft_description("sin título");
        let before = h.vm.state().draft.clone();

        let outcome = block_on(h.vm.submit_create());
        assert!(matches!(outcome, SubmitOutcome::Rejected(ReportError::ValidationFailed(_))));
        assert_eq!(h.api.create_calls(), 0);
        assert_eq!(h.api.list_calls(), 0);

        let state = h.vm.state();
        assert_eq!(state.draft, before);
        assert_eq!(state.create_flow, CreateFlow::Editing);
    }

    #[test]
    fn test_denied_location_keeps_form_open() {
        let api = Rc::new(FakeReportsApi::new());
        let session = SessionState::new();
        session.set_session(crate::testing::sample_session());
        let vm = ReportViewModel::new(
            api.clone(),
            Rc::new(FakeLocation::denied()),
            Rc::new(FakeIdentity::accepting()),
            session,
            &AppConfig::default(),
        );
        vm.open_create();
        vm.set_draft_title("Tiradero");

        let outcome = block_on(vm.submit_create());
        assert!(matches!(outcome, SubmitOutcome::Rejected(ReportError::LocationUnavailable(_))));
        assert_eq!(api.create_calls(), 0);
        assert_eq!(vm.state().create_flow, CreateFlow::Editing);
        assert_eq!(vm.state().draft.title, "Tiradero");
    }

    #[test]
    fn test_write_failure_allows_retry() {
        let h = signed_in_harness();
        h.vm.open_create();
        h.vm.set_draft_title("Tiradero");
        h.api.set_create_result(Err(ReportError::WriteFailed("HTTP 502: Bad Gateway".into())));

        let outcome = block_on(h.vm.submit_create());
        assert!(matches!(outcome, SubmitOutcome::Rejected(ReportError::WriteFailed(_))));
        assert_eq!(h.api.list_calls(), 0);
        assert_eq!(h.vm.state().create_flow, CreateFlow::Editing);
        assert_eq!(h.vm.state().draft.title, "Tiradero");

        h.api.set_create_result(Ok(json!({"id": "9"})));
        assert_eq!(block_on(h.vm.submit_create()), SubmitOutcome::Created);
        assert_eq!(h.api.create_calls(), 2);
    }

    #[test]
    fn test_submit_outside_editing_is_ignored() {
        let h = harness();
        assert_eq!(block_on(h.vm.submit_create()), SubmitOutcome::Ignored);
        assert_eq!(h.api.create_calls(), 0);
    }

    #[test]
    fn test_sign_out_with_open_form_routes_next_open_to_login() {
        let h = signed_in_harness();
        assert_eq!(h.vm.open_create(), CreateFlow::Editing);
        h.vm.set_draft_title("Pendiente");

        block_on(h.vm.sign_out()).unwrap();
        assert_eq!(h.vm.state().create_flow, CreateFlow::Closed);
        assert_eq!(h.vm.open_create(), CreateFlow::LoginPrompt);
        assert_eq!(h.vm.state().draft.title, "Pendiente");
    }

    #[test]
    fn test_sign_out_during_submit_does_not_reopen_form() {
        let h = signed_in_harness();
        h.vm.open_create();
        h.vm.set_draft_title("Tiradero");
        h.api.set_create_result(Err(ReportError::WriteFailed("HTTP 500".into())));
        let release = h.location.hold_permission();

        let (outcome, _) = block_on(async {
            futures::join!(h.vm.submit_create(), async {
                h.vm.sign_out().await.unwrap();
                release.send(()).unwrap();
            })
        });

        assert!(matches!(outcome, SubmitOutcome::Rejected(ReportError::WriteFailed(_))));
        assert!(!h.vm.session().is_authenticated());
        assert_eq!(h.vm.state().create_flow, CreateFlow::Closed);
        assert_eq!(h.vm.state().draft.title, "Tiradero");

        assert_eq!(block_on(h.vm.submit_create()), SubmitOutcome::Ignored);
        assert_eq!(h.vm.open_create(), CreateFlow::LoginPrompt);
        assert_eq!(h.api.create_calls(), 1);
    }

    #[test]
    fn test_submit_without_session_routes_to_login() {
        let h = harness();
        h.vm.state.borrow_mut().create_flow = CreateFlow::Editing;
        h.vm.set_draft_title("Tiradero");

        assert_eq!(block_on(h.vm.submit_create()), SubmitOutcome::Ignored);
        assert_eq!(h.vm.state().create_flow, CreateFlow::LoginPrompt);
        assert_eq!(h.api.create_calls(), 0);
        assert_eq!(h.location.permission_calls(), 0);
    }

    #[test]
    fn test_form_is_locked_while_submitting() {
        let h = signed_in_harness();
        h.vm.open_create();
        h.vm.set_draft_title("Llantas");
        let release = h.location.hold_permission();

        let (outcome, _) = block_on(async {
            futures::join!(h.vm.submit_create(), async {
                assert!(h.vm.state().is_submitting());
                assert!(!h.vm.set_draft_title("Otro título"));
                assert!(!h.vm.set_draft_status("resolved"));
                assert_eq!(h.vm.open_create(), CreateFlow::Submitting);
                assert_eq!(h.vm.submit_create().await, SubmitOutcome::Ignored);
                release.send(()).unwrap();
            })
        });

        assert_eq!(outcome, SubmitOutcome::Created);
        assert_eq!(h.api.create_calls(), 1);
        assert_eq!(h.api.last_request().unwrap().title, "Llantas");
    }

    #[test]
    fn test_post_create_fetch_supersedes_in_flight_refresh() {
        let h = signed_in_harness();
        h.vm.open_create();
        h.vm.set_draft_title("Nuevo");

        let release = h.api.push_gated_list(Ok(json!([])));
        h.api.push_list(Ok(two_reports()));

        let (refresh, submit) = block_on(async {
            futures::join!(h.vm.refresh(), async {
                let outcome = h.vm.submit_create().await;
                release.send(()).unwrap();
                outcome
            })
        });

        assert_eq!(refresh, RefreshOutcome::Stale);
        assert_eq!(submit, SubmitOutcome::Created);
        assert_eq!(h.api.list_calls(), 2);

        let state = h.vm.state();
        assert_eq!(state.reports.len(), 1);
        assert_eq!(state.fetch_generation, 2);
        assert!(!state.is_loading);
    }

    #[test]
    fn test_teardown_freezes_state_and_unsubscribes() {
        let h = harness();
        let release = h.api.push_gated_list(Ok(two_reports()));
        assert_eq!(h.vm.session().subscriber_count(), 1);

        let (outcome, _) = block_on(async {
            futures::join!(h.vm.refresh(), async {
                h.vm.teardown();
                release.send(()).unwrap();
            })
        });

        assert_eq!(outcome, RefreshOutcome::Detached);
        assert!(h.vm.state().reports.is_empty());
        assert_eq!(h.vm.session().subscriber_count(), 0);
        assert_eq!(block_on(h.vm.refresh()), RefreshOutcome::Detached);
    }

    #[test]
    fn test_draft_status_must_belong_to_catalog() {
        let h = harness();
        assert!(h.vm.set_draft_status("resolved"));
        assert!(!h.vm.set_draft_status("closed"));
        assert_eq!(h.vm.state().draft.status, "resolved");
    }

    #[test]
    fn test_dismiss_notification() {
        let h = harness();
        h.api.push_list(Err(ReportError::FetchFailed("offline".into())));
        block_on(h.vm.refresh());
        assert!(h.vm.state().notification.is_some());

        h.vm.dismiss_notification();
        assert!(h.vm.state().notification.is_none());
    }
}
