// ============================================================================
// SESSION STATE - Sesión actual + canal de cambios de sesión
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Session, SessionEvent};
use crate::state::reactivity::{EventChannel, SubscriptionId};

/// Estado de autenticación observable
#[derive(Clone)]
pub struct SessionState {
    current: Rc<RefCell<Option<Session>>>,
    events: EventChannel<SessionEvent>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            current: Rc::new(RefCell::new(None)),
            events: EventChannel::new(),
        }
    }

    /// Obtener sesión actual
    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Establecer sesión y notificar SignedIn
    pub fn set_session(&self, session: Session) {
        *self.current.borrow_mut() = Some(session.clone());
        log::info!("🔐 Sesión iniciada: {}", session.label());
        self.events.emit(&SessionEvent::SignedIn(session));
    }

    /// Limpiar sesión y notificar SignedOut (solo si había sesión)
    pub fn clear(&self) {
        let previous = self.current.borrow_mut().take();
        if previous.is_some() {
            log::info!("👋 Sesión cerrada");
            self.events.emit(&SessionEvent::SignedOut);
        }
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&SessionEvent) + 'static,
    {
        self.events.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
