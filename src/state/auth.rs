/// Authentication context
///
/// Owns the signed-in identity, the session token and the API client that
/// carries it. Every page receives it by reference; only login, register
/// and logout write to it.
use std::future::Future;

use super::data::{AuthSession, Comment, Role, User};
use super::session::SessionStore;
use crate::api::{ApiClient, ApiError, LoginRequest, RegisterRequest};

/// Who is using the app right now
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Anonymous,
    Authenticated(AuthSession),
}

#[derive(Debug)]
pub struct AuthContext {
    state: AuthState,
    api: ApiClient,
    store: Option<SessionStore>,
}

impl AuthContext {
    /// Build the context, restoring a persisted session when the store has one
    pub fn new(api: ApiClient, store: Option<SessionStore>) -> Self {
        let mut context = AuthContext {
            state: AuthState::Anonymous,
            api,
            store,
        };

        let restored = match context.store.as_ref().map(SessionStore::load) {
            Some(Ok(session)) => session,
            Some(Err(e)) => {
                log::warn!("⚠️  Discarding unreadable stored session: {}", e);
                context.forget_stored_session();
                None
            }
            None => None,
        };

        if let Some(session) = restored {
            log::info!("🔑 Restored session for {}", session.user.username);
            context.enter(session);
        }

        context
    }

    /// The API client, carrying the current session token
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            AuthState::Authenticated(session) => Some(&session.user),
            AuthState::Anonymous => None,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user().map(|user| user.role)
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role() == Some(role)
    }

    /// Whether the delete control is shown for `comment`.
    ///
    /// Only a display affordance: the server decides whether a delete is
    /// actually allowed.
    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.user().is_some_and(|user| user.id == comment.user.id)
    }

    /// Call `POST /auth/login`; apply the result with [`AuthContext::sign_in`]
    pub fn login(
        &self,
        request: LoginRequest,
    ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send + 'static {
        let api = self.api.clone();
        async move { api.login(&request).await }
    }

    /// Call `POST /auth/register`; apply the result with [`AuthContext::sign_in`]
    pub fn register(
        &self,
        request: RegisterRequest,
    ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send + 'static {
        let api = self.api.clone();
        async move { api.register(&request).await }
    }

    /// Transition to Authenticated and persist the session
    pub fn sign_in(&mut self, session: AuthSession) {
        log::info!(
            "🔑 Signed in as {} ({})",
            session.user.username,
            session.user.role.as_str()
        );

        if let Some(store) = &self.store {
            if let Err(e) = store.save(&session) {
                log::error!("Failed to persist session: {}", e);
            }
        }

        self.enter(session);
    }

    /// Transition back to Anonymous and drop the persisted session
    pub fn logout(&mut self) {
        if let Some(user) = self.user() {
            log::info!("👋 Signed out {}", user.username);
        }
        self.state = AuthState::Anonymous;
        self.api.set_token(None);
        self.forget_stored_session();
    }

    fn enter(&mut self, session: AuthSession) {
        self.api.set_token(Some(session.token.clone()));
        self.state = AuthState::Authenticated(session);
    }

    fn forget_stored_session(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                log::error!("Failed to clear stored session: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::UserRef;
    use chrono::Utc;

    fn api() -> ApiClient {
        ApiClient::new("http://localhost:5000/api").unwrap()
    }

    fn session(id: &str, role: Role) -> AuthSession {
        AuthSession {
            token: format!("token-{}", id),
            user: User {
                id: id.to_string(),
                username: format!("user-{}", id),
                email: None,
                role,
            },
        }
    }

    fn comment_by(author: &str) -> Comment {
        Comment {
            id: "c1".to_string(),
            photo: None,
            user: UserRef {
                id: author.to_string(),
                username: "someone".to_string(),
            },
            text: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_starts_anonymous_without_store() {
        let auth = AuthContext::new(api(), None);
        assert_eq!(&auth.state, &AuthState::Anonymous);
        assert!(auth.api().token().is_none());
    }

    #[test]
    fn test_sign_in_and_logout_transitions() {
        let mut auth = AuthContext::new(api(), None);

        auth.sign_in(session("u1", Role::Consumer));
        assert!(auth.user().is_some());
        assert!(auth.has_role(Role::Consumer));
        assert!(!auth.has_role(Role::Creator));
        assert_eq!(auth.api().token(), Some("token-u1"));

        auth.logout();
        assert_eq!(&auth.state, &AuthState::Anonymous);
        assert_eq!(auth.role(), None);
        assert!(auth.api().token().is_none());
    }

    #[test]
    fn test_session_restored_from_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");

        {
            let mut auth = AuthContext::new(api(), Some(SessionStore::open(&path).unwrap()));
            auth.sign_in(session("u7", Role::Creator));
        }

        let auth = AuthContext::new(api(), Some(SessionStore::open(&path).unwrap()));
        assert!(auth.has_role(Role::Creator));
        assert_eq!(auth.api().token(), Some("token-u7"));
    }

    #[test]
    fn test_logout_clears_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.db");

        {
            let mut auth = AuthContext::new(api(), Some(SessionStore::open(&path).unwrap()));
            auth.sign_in(session("u7", Role::Creator));
            auth.logout();
        }

        let auth = AuthContext::new(api(), Some(SessionStore::open(&path).unwrap()));
        assert!(auth.user().is_none());
    }

    #[test]
    fn test_delete_offered_only_to_author() {
        let mut auth = AuthContext::new(api(), None);
        let mine = comment_by("u1");
        let theirs = comment_by("u2");

        assert!(!auth.can_delete(&mine));

        auth.sign_in(session("u1", Role::Consumer));
        assert!(auth.can_delete(&mine));
        assert!(!auth.can_delete(&theirs));
    }
}
