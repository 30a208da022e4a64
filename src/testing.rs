// Colaboradores falsos para los tests (sin red, sin navegador)

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{json, Value};

use crate::error::{ReportError, ReportResult};
use crate::models::{Coordinates, FederatedCredential, NewReportRequest, Session};
use crate::services::traits::{IdentityProvider, LocationPermission, LocationProvider, ReportsApi};

pub fn sample_session() -> Session {
    Session {
        uid: "uid-123".to_string(),
        display_name: Some("Ana".to_string()),
        email: Some("ana@example.com".to_string()),
        id_token: "token-abc".to_string(),
        signed_in_at: chrono::Utc::now(),
    }
}

struct ListResponse {
    gate: Option<oneshot::Receiver<()>>,
    result: ReportResult<Value>,
}

pub struct FakeReportsApi {
    list_queue: RefCell<VecDeque<ListResponse>>,
    create_result: RefCell<ReportResult<Value>>,
    list_calls: Cell<usize>,
    create_calls: Cell<usize>,
    last_request: RefCell<Option<NewReportRequest>>,
    last_token: RefCell<Option<String>>,
}

impl FakeReportsApi {
    pub fn new() -> Self {
        Self {
            list_queue: RefCell::new(VecDeque::new()),
            create_result: RefCell::new(Ok(json!({"id": "new"}))),
            list_calls: Cell::new(0),
            create_calls: Cell::new(0),
            last_request: RefCell::new(None),
            last_token: RefCell::new(None),
        }
    }

    /// Próxima respuesta de GET (inmediata)
    pub fn push_list(&self, result: ReportResult<Value>) {
        self.list_queue.borrow_mut().push_back(ListResponse { gate: None, result });
    }

    /// Próxima respuesta de GET, retenida hasta que se envíe por el Sender
    pub fn push_gated_list(&self, result: ReportResult<Value>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.list_queue.borrow_mut().push_back(ListResponse {
            gate: Some(rx),
            result,
        });
        tx
    }

    pub fn set_create_result(&self, result: ReportResult<Value>) {
        *self.create_result.borrow_mut() = result;
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.get()
    }

    pub fn last_request(&self) -> Option<NewReportRequest> {
        self.last_request.borrow().clone()
    }

    pub fn last_token(&self) -> Option<String> {
        self.last_token.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ReportsApi for FakeReportsApi {
    async fn list_reports(&self) -> ReportResult<Value> {
        self.list_calls.set(self.list_calls.get() + 1);
        let next = self.list_queue.borrow_mut().pop_front();
        match next {
            Some(ListResponse { gate, result }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Ok(json!([])),
        }
    }

    async fn create_report(
        &self,
        request: &NewReportRequest,
        bearer_token: Option<&str>,
    ) -> ReportResult<Value> {
        self.create_calls.set(self.create_calls.get() + 1);
        *self.last_request.borrow_mut() = Some(request.clone());
        *self.last_token.borrow_mut() = bearer_token.map(str::to_string);
        self.create_result.borrow().clone()
    }
}

pub struct FakeLocation {
    permission: LocationPermission,
    position: ReportResult<Coordinates>,
    permission_gate: RefCell<Option<oneshot::Receiver<()>>>,
    permission_calls: Cell<usize>,
    position_calls: Cell<usize>,
}

impl FakeLocation {
    pub fn granted(coords: Coordinates) -> Self {
        Self {
            permission: LocationPermission::Granted,
            position: Ok(coords),
            permission_gate: RefCell::new(None),
            permission_calls: Cell::new(0),
            position_calls: Cell::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: LocationPermission::Denied,
            position: Err(ReportError::LocationUnavailable("denied".to_string())),
            permission_gate: RefCell::new(None),
            permission_calls: Cell::new(0),
            position_calls: Cell::new(0),
        }
    }

    /// La próxima consulta de permiso queda retenida hasta que se envíe por el Sender
    pub fn hold_permission(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.permission_gate.borrow_mut() = Some(rx);
        tx
    }

    pub fn permission_calls(&self) -> usize {
        self.permission_calls.get()
    }

    pub fn position_calls(&self) -> usize {
        self.position_calls.get()
    }
}

#[async_trait(?Send)]
impl LocationProvider for FakeLocation {
    async fn request_permission(&self) -> LocationPermission {
        self.permission_calls.set(self.permission_calls.get() + 1);
        let gate = self.permission_gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.permission
    }

    async fn current_position(&self) -> ReportResult<Coordinates> {
        self.position_calls.set(self.position_calls.get() + 1);
        self.position.clone()
    }
}

pub struct FakeIdentity {
    result: RefCell<ReportResult<Session>>,
    sign_out_calls: Cell<usize>,
}

impl FakeIdentity {
    pub fn accepting() -> Self {
        Self {
            result: RefCell::new(Ok(sample_session())),
            sign_out_calls: Cell::new(0),
        }
    }

    pub fn rejecting(message: &str) -> Self {
        Self {
            result: RefCell::new(Err(ReportError::AuthFailed(message.to_string()))),
            sign_out_calls: Cell::new(0),
        }
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.get()
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FakeIdentity {
    async fn sign_in_with_credential(&self, _credential: &FederatedCredential) -> ReportResult<Session> {
        self.result.borrow().clone()
    }

    async fn sign_out(&self) -> ReportResult<()> {
        self.sign_out_calls.set(self.sign_out_calls.get() + 1);
        Ok(())
    }
}
