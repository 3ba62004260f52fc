/// Screens the app can show, and the guard in front of the gated ones
use std::fmt;

use crate::state::auth::AuthContext;
use crate::state::data::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    /// Creators only
    CreatorUpload,
    /// Consumers only
    Consumer,
    PhotoDetail(String),
}

impl Route {
    /// Role a user must hold to open this route
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::CreatorUpload => Some(Role::Creator),
            Route::Consumer => Some(Role::Consumer),
            Route::Home | Route::Login | Route::Register | Route::PhotoDetail(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/"),
            Route::Login => write!(f, "/login"),
            Route::Register => write!(f, "/register"),
            Route::CreatorUpload => write!(f, "/creator/upload"),
            Route::Consumer => write!(f, "/consumer"),
            Route::PhotoDetail(id) => write!(f, "/photo/{}", id),
        }
    }
}

/// Outcome of checking a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Allow,
    Redirect(Route),
}

/// Check whether the current user may open `route`.
///
/// Anonymous users are sent to Login; signed-in users holding the wrong
/// role are sent Home.
pub fn guard(route: &Route, auth: &AuthContext) -> Guard {
    let Some(required) = route.required_role() else {
        return Guard::Allow;
    };

    match auth.role() {
        None => Guard::Redirect(Route::Login),
        Some(role) if role == required => Guard::Allow,
        Some(_) => Guard::Redirect(Route::Home),
    }
}

/// The route that will actually be shown for a navigation to `route`
pub fn resolve(route: Route, auth: &AuthContext) -> Route {
    match guard(&route, auth) {
        Guard::Allow => route,
        Guard::Redirect(target) => {
            log::info!("🚧 {} is not available, redirecting to {}", route, target);
            target
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::state::data::{AuthSession, User};

    fn auth_as(role: Option<Role>) -> AuthContext {
        let mut auth = AuthContext::new(ApiClient::new("http://localhost:5000/api").unwrap(), None);
        if let Some(role) = role {
            auth.sign_in(AuthSession {
                token: "t".to_string(),
                user: User {
                    id: "u1".to_string(),
                    username: "ana".to_string(),
                    email: None,
                    role,
                },
            });
        }
        auth
    }

    #[test]
    fn test_open_routes_always_allowed() {
        let anonymous = auth_as(None);
        for route in [
            Route::Home,
            Route::Login,
            Route::Register,
            Route::PhotoDetail("p1".to_string()),
        ] {
            assert_eq!(guard(&route, &anonymous), Guard::Allow);
        }
    }

    #[test]
    fn test_anonymous_redirected_to_login() {
        let anonymous = auth_as(None);
        assert_eq!(guard(&Route::CreatorUpload, &anonymous), Guard::Redirect(Route::Login));
        assert_eq!(guard(&Route::Consumer, &anonymous), Guard::Redirect(Route::Login));
    }

    #[test]
    fn test_wrong_role_redirected_home() {
        let consumer = auth_as(Some(Role::Consumer));
        let creator = auth_as(Some(Role::Creator));

        assert_eq!(resolve(Route::CreatorUpload, &consumer), Route::Home);
        assert_eq!(resolve(Route::Consumer, &creator), Route::Home);
    }

    #[test]
    fn test_matching_role_allowed() {
        assert_eq!(resolve(Route::CreatorUpload, &auth_as(Some(Role::Creator))), Route::CreatorUpload);
        assert_eq!(resolve(Route::Consumer, &auth_as(Some(Role::Consumer))), Route::Consumer);
    }

    #[test]
    fn test_paths() {
        assert_eq!(Route::PhotoDetail("p1".to_string()).to_string(), "/photo/p1");
        assert_eq!(Route::CreatorUpload.to_string(), "/creator/upload");
    }
}
