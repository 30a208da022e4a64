// ============================================================================
// AUTH SERVICE - Intercambio de credencial federada por sesión
// ============================================================================
// El almacenamiento del token lo gestiona el proveedor; aquí solo se
// publica la sesión en SessionState.
// ============================================================================

use std::rc::Rc;

use crate::error::ReportResult;
use crate::models::{FederatedCredential, Session};
use crate::services::traits::IdentityProvider;
use crate::state::SessionState;

pub struct AuthService<I> {
    provider: Rc<I>,
    session: SessionState,
}

impl<I> Clone for AuthService<I> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            session: self.session.clone(),
        }
    }
}

impl<I: IdentityProvider> AuthService<I> {
    pub fn new(provider: Rc<I>, session: SessionState) -> Self {
        Self { provider, session }
    }

    /// Login con credencial externa
    pub async fn sign_in(&self, credential: &FederatedCredential) -> ReportResult<Session> {
        log::info!("🔐 Intercambiando credencial de {}...", credential.provider_id);

        match self.provider.sign_in_with_credential(credential).await {
            Ok(session) => {
                self.session.set_session(session.clone());
                Ok(session)
            }
            Err(e) => {
                log::error!("❌ Login rechazado: {}", e);
                Err(e)
            }
        }
    }

    /// Logout: la sesión local se limpia aunque el proveedor falle
    pub async fn sign_out(&self) -> ReportResult<()> {
        let result = self.provider.sign_out().await;
        if let Err(e) = &result {
            log::warn!("⚠️ Error cerrando sesión en el proveedor: {}", e);
        }
        self.session.clear();
        result
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }
}

// ============================================================================
// FIREBASE (solo wasm32) - accounts:signInWithIdp por REST
// ============================================================================

#[cfg(target_arch = "wasm32")]
pub use firebase::FirebaseIdentity;

#[cfg(target_arch = "wasm32")]
mod firebase {
    use async_trait::async_trait;
    use gloo_net::http::Request;

    use crate::config::IdentityConfig;
    use crate::error::{ReportError, ReportResult};
    use crate::models::{FederatedCredential, Session};
    use crate::services::traits::IdentityProvider;

    #[derive(serde::Serialize)]
    #[serde(rename_all = "camelCase")]
    struct SignInWithIdpRequest {
        post_body: String,
        request_uri: String,
        return_idp_credential: bool,
        return_secure_token: bool,
    }

    #[derive(serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct SignInWithIdpResponse {
        local_id: String,
        id_token: String,
        email: Option<String>,
        display_name: Option<String>,
    }

    /// Proveedor de identidad Firebase (Identity Toolkit)
    #[derive(Clone)]
    pub struct FirebaseIdentity {
        config: IdentityConfig,
    }

    impl FirebaseIdentity {
        pub fn new(config: IdentityConfig) -> Self {
            Self { config }
        }
    }

    #[async_trait(?Send)]
    impl IdentityProvider for FirebaseIdentity {
        async fn sign_in_with_credential(&self, credential: &FederatedCredential) -> ReportResult<Session> {
            let url = format!(
                "{}/accounts:signInWithIdp?key={}",
                self.config.identity_toolkit_url, self.config.firebase_api_key
            );
            let request = SignInWithIdpRequest {
                post_body: format!(
                    "id_token={}&providerId={}",
                    credential.id_token, credential.provider_id
                ),
                request_uri: self.config.request_uri.clone(),
                return_idp_credential: true,
                return_secure_token: true,
            };

            let response = Request::post(&url)
                .json(&request)
                .map_err(|e| ReportError::AuthFailed(format!("Serialization error: {}", e)))?
                .send()
                .await
                .map_err(|e| ReportError::AuthFailed(format!("Network error: {}", e)))?;

            if !response.ok() {
                let status = response.status();
                let error_text = response.text().await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(ReportError::AuthFailed(format!("HTTP {}: {}", status, error_text)));
            }

            let body = response
                .json::<SignInWithIdpResponse>()
                .await
                .map_err(|e| ReportError::AuthFailed(format!("Parse error: {}", e)))?;

            Ok(Session {
                uid: body.local_id,
                display_name: body.display_name,
                email: body.email,
                id_token: body.id_token,
                signed_in_at: chrono::Utc::now(),
            })
        }

        async fn sign_out(&self) -> ReportResult<()> {
            // El token de Firebase no se revoca desde el cliente
            Ok(())
        }
    }
}
