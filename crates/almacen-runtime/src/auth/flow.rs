//! Login, logout and unauthorized-response handling.

use super::{AuthError, AuthService, Credentials};
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use almacen_auth::token;
use almacen_types::User;
use tracing::{debug, info, warn};

/// HTTP status that ends the session.
pub const UNAUTHORIZED: u16 = 401;

/// Fallback message when a rejection carries none.
const DEFAULT_REJECTION: &str = "invalid credentials";

/// Logs in through `service` and stores the resulting session.
///
/// The session is written only when the response reports success, carries
/// both a token and a user, and the token is not already expired.
/// Otherwise the store is left untouched.
///
/// # Errors
///
/// - [`AuthError::Rejected`] when the server answers `success: false`
/// - [`AuthError::IncompleteResponse`] when the token or user is missing
/// - [`AuthError::TokenExpired`] when the token is unreadable or expired
/// - [`AuthError::Transport`] when the service call fails
/// - [`AuthError::Session`] when the session cannot be written
pub async fn login<A, S>(
    service: &A,
    session: &SessionStore<S>,
    credentials: &Credentials,
) -> Result<User, AuthError>
where
    A: AuthService,
    S: KeyValueStore,
{
    let response = service.login(credentials).await?;

    if !response.success {
        let message = response
            .message
            .unwrap_or_else(|| DEFAULT_REJECTION.to_string());
        debug!(usuario = %credentials.usuario, %message, "Login rejected");
        return Err(AuthError::Rejected { message });
    }

    let (Some(token), Some(user)) = (response.token, response.user) else {
        warn!(usuario = %credentials.usuario, "Login response missing token or user");
        return Err(AuthError::IncompleteResponse);
    };

    if token::is_expired_now(&token) {
        warn!(user_id = %user.id, "Login returned an expired token");
        return Err(AuthError::TokenExpired);
    }

    session.set_session(&token, &user)?;
    info!(user_id = %user.id, rol = %user.rol, "Logged in");
    Ok(user)
}

/// Logs out: notifies `service`, then clears the session.
///
/// The session is cleared even when the service call fails; that failure
/// is logged and not returned.
///
/// # Errors
///
/// Returns [`AuthError::Session`] only if clearing local storage fails.
pub async fn logout<A, S>(service: &A, session: &SessionStore<S>) -> Result<(), AuthError>
where
    A: AuthService,
    S: KeyValueStore,
{
    if let Err(e) = service.logout().await {
        warn!(error = %e, "Logout request failed, clearing local session anyway");
    }
    session.clear()?;
    info!("Logged out");
    Ok(())
}

/// Reacts to an API response status.
///
/// On [`UNAUTHORIZED`] the session is cleared and `true` is returned so the
/// caller can send the user back to the login screen. Any other status is
/// ignored.
pub fn handle_status<S: KeyValueStore>(session: &SessionStore<S>, status: u16) -> bool {
    if status != UNAUTHORIZED {
        return false;
    }
    if let Err(e) = session.clear() {
        warn!(error = %e, "Failed to clear session after 401");
    }
    info!("Session ended by server (401)");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LoginResponse;
    use crate::storage::MemoryStore;
    use almacen_types::Role;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine as _;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn token_expiring_at(exp: i64) -> String {
        format!("h.{}.s", URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#)))
    }

    fn valid_token() -> String {
        // 2100-01-01
        token_expiring_at(4_102_444_800)
    }

    struct MockService {
        response: Result<LoginResponse, String>,
        logout_error: Option<String>,
        logouts: AtomicUsize,
    }

    impl MockService {
        fn answering(response: LoginResponse) -> Self {
            Self {
                response: Ok(response),
                logout_error: None,
                logouts: AtomicUsize::new(0),
            }
        }

        fn unreachable() -> Self {
            Self {
                response: Err("connection refused".into()),
                logout_error: Some("connection refused".into()),
                logouts: AtomicUsize::new(0),
            }
        }
    }

    impl AuthService for MockService {
        fn login(
            &self,
            _credentials: &Credentials,
        ) -> impl Future<Output = Result<LoginResponse, AuthError>> + Send {
            let response = self.response.clone().map_err(AuthError::transport);
            async move { response }
        }

        fn logout(&self) -> impl Future<Output = Result<(), AuthError>> + Send {
            self.logouts.fetch_add(1, Ordering::SeqCst);
            let result = match &self.logout_error {
                Some(reason) => Err(AuthError::transport(reason.clone())),
                None => Ok(()),
            };
            async move { result }
        }
    }

    fn creds() -> Credentials {
        Credentials::new("ana", "secret")
    }

    fn memory_session() -> SessionStore<MemoryStore> {
        SessionStore::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn successful_login_stores_session() {
        let user = User::new(1, "Ana Lopez", Role::Administrador);
        let service = MockService::answering(LoginResponse::success(valid_token(), user.clone()));
        let session = memory_session();

        let logged_in = login(&service, &session, &creds()).await.unwrap();

        assert_eq!(logged_in, user);
        assert!(session.is_authenticated());
        assert!(session.is_active());
        assert!(session.policy().can_manage_users());
    }

    #[tokio::test]
    async fn rejected_login_leaves_store_untouched() {
        let service = MockService::answering(LoginResponse::failure("Usuario inactivo"));
        let session = memory_session();

        let err = login(&service, &session, &creds()).await.unwrap_err();

        assert!(matches!(
            err,
            AuthError::Rejected { ref message } if message == "Usuario inactivo"
        ));
        assert!(session.storage().is_empty());
    }

    #[tokio::test]
    async fn rejection_without_message_uses_default() {
        let service = MockService::answering(LoginResponse::default());
        let err = login(&service, &memory_session(), &creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::Rejected { ref message } if message == DEFAULT_REJECTION));
    }

    #[tokio::test]
    async fn success_without_user_is_incomplete() {
        let service = MockService::answering(LoginResponse {
            success: true,
            token: Some(valid_token()),
            ..LoginResponse::default()
        });
        let session = memory_session();

        let err = login(&service, &session, &creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::IncompleteResponse));
        assert!(session.storage().is_empty());
    }

    #[tokio::test]
    async fn expired_token_is_not_stored() {
        let user = User::new(2, "", Role::Cajero);
        let service = MockService::answering(LoginResponse::success(token_expiring_at(1), user));
        let session = memory_session();

        let err = login(&service, &session, &creds()).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let session = memory_session();
        let err = login(&MockService::unreachable(), &session, &creds())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
        assert!(session.storage().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let user = User::new(1, "A", Role::Gerente);
        let service = MockService::answering(LoginResponse::success(valid_token(), user));
        let session = memory_session();
        login(&service, &session, &creds()).await.unwrap();

        logout(&service, &session).await.unwrap();

        assert_eq!(service.logouts.load(Ordering::SeqCst), 1);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_even_when_service_fails() {
        let session = memory_session();
        session
            .set_session(&valid_token(), &User::new(1, "A", Role::Gerente))
            .unwrap();

        let service = MockService::unreachable();
        logout(&service, &session).await.unwrap();

        assert_eq!(service.logouts.load(Ordering::SeqCst), 1);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn unauthorized_status_clears_session() {
        let session = memory_session();
        session
            .set_session("tok", &User::new(3, "Luis", Role::Vendedor))
            .unwrap();

        assert!(!handle_status(&session, 200));
        assert!(!handle_status(&session, 403));
        assert!(session.is_authenticated());

        assert!(handle_status(&session, UNAUTHORIZED));
        assert!(!session.is_authenticated());
    }
}
