use env_logger::Env;
use iced::{Element, Task, Theme};

mod api;
mod config;
mod media;
mod routes;
mod state;
mod ui;

use api::ApiClient;
use config::Config;
use routes::Route;
use state::auth::AuthContext;
use state::session::SessionStore;
use ui::consumer::{self, Consumer};
use ui::home::{self, Home};
use ui::login::{self, Login};
use ui::photo_detail::{self, PhotoDetail};
use ui::register::{self, Register};
use ui::upload::{self, UploadPage};
use ui::Action;

/// Main application state
struct PhotoShare {
    /// Who is signed in, plus the API client carrying their token
    auth: AuthContext,
    /// The page currently on screen; replaced wholesale on navigation
    screen: Screen,
}

enum Screen {
    Home(Home),
    Login(Login),
    Register(Register),
    Upload(UploadPage),
    Consumer(Consumer),
    PhotoDetail(PhotoDetail),
}

impl Screen {
    fn route(&self) -> Route {
        match self {
            Screen::Home(_) => Route::Home,
            Screen::Login(_) => Route::Login,
            Screen::Register(_) => Route::Register,
            Screen::Upload(_) => Route::CreatorUpload,
            Screen::Consumer(_) => Route::Consumer,
            Screen::PhotoDetail(page) => Route::PhotoDetail(page.photo_id().to_string()),
        }
    }
}

/// Application messages, one variant per page
#[derive(Debug, Clone)]
enum Message {
    Home(home::Message),
    Login(login::Message),
    Register(register::Message),
    Upload(upload::Message),
    Consumer(consumer::Message),
    PhotoDetail(photo_detail::Message),
}

impl PhotoShare {
    fn new(auth: AuthContext) -> (Self, Task<Message>) {
        let mut app = PhotoShare {
            auth,
            screen: Screen::Home(Home::new()),
        };
        let task = app.navigate(Route::Home);
        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match (&mut self.screen, message) {
            (Screen::Home(page), Message::Home(message)) => {
                let action = page.update(message, &self.auth);
                self.apply(action, Message::Home)
            }
            (Screen::Login(page), Message::Login(message)) => {
                let action = page.update(message, &self.auth);
                self.apply(action, Message::Login)
            }
            (Screen::Register(page), Message::Register(message)) => {
                let action = page.update(message, &self.auth);
                self.apply(action, Message::Register)
            }
            (Screen::Upload(page), Message::Upload(message)) => {
                let action = page.update(message, &self.auth);
                self.apply(action, Message::Upload)
            }
            (Screen::Consumer(page), Message::Consumer(message)) => {
                let action = page.update(message, &self.auth);
                self.apply(action, Message::Consumer)
            }
            (Screen::PhotoDetail(page), Message::PhotoDetail(message)) => {
                let action = page.update(message, &self.auth);
                self.apply(action, Message::PhotoDetail)
            }
            (_, message) => {
                // Late result for a page that has since been closed
                log::debug!("Dropping message for inactive screen: {:?}", message);
                Task::none()
            }
        }
    }

    /// Carry out what a page asked for
    fn apply<M: Send + 'static>(&mut self, action: Action<M>, wrap: fn(M) -> Message) -> Task<Message> {
        match action {
            Action::None => Task::none(),
            Action::Run(task) => task.map(wrap),
            Action::Navigate(route) => self.navigate(route),
            Action::SignedIn(session) => {
                self.auth.sign_in(session);
                self.navigate(Route::Home)
            }
            Action::SignedOut => {
                self.auth.logout();
                self.user_changed()
            }
        }
    }

    /// Open `route`, or wherever the guard sends the current user instead
    fn navigate(&mut self, route: Route) -> Task<Message> {
        let route = routes::resolve(route, &self.auth);
        log::info!("🧭 Navigating to {}", route);

        match route {
            Route::Home => {
                let mut page = Home::new();
                let task = page.open(&self.auth).map(Message::Home);
                self.screen = Screen::Home(page);
                task
            }
            Route::Login => {
                self.screen = Screen::Login(Login::new());
                Task::none()
            }
            Route::Register => {
                self.screen = Screen::Register(Register::new());
                Task::none()
            }
            Route::CreatorUpload => {
                self.screen = Screen::Upload(UploadPage::new());
                Task::none()
            }
            Route::Consumer => {
                let mut page = Consumer::new();
                let task = page.open(&self.auth).map(Message::Consumer);
                self.screen = Screen::Consumer(page);
                task
            }
            Route::PhotoDetail(photo_id) => {
                let mut page = PhotoDetail::new(photo_id);
                let task = page.reload(&self.auth).map(Message::PhotoDetail);
                self.screen = Screen::PhotoDetail(page);
                task
            }
        }
    }

    /// Re-run the guard and reload the open page for the new identity
    fn user_changed(&mut self) -> Task<Message> {
        match &mut self.screen {
            Screen::PhotoDetail(page) => page.reload(&self.auth).map(Message::PhotoDetail),
            screen => {
                let route = screen.route();
                self.navigate(route)
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        match &self.screen {
            Screen::Home(page) => page.view(&self.auth).map(Message::Home),
            Screen::Login(page) => page.view().map(Message::Login),
            Screen::Register(page) => page.view().map(Message::Register),
            Screen::Upload(page) => page.view().map(Message::Upload),
            Screen::Consumer(page) => page.view().map(Message::Consumer),
            Screen::PhotoDetail(page) => page.view(&self.auth).map(Message::PhotoDetail),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Open the session database, or run without persistence if that fails
fn open_session_store(config: &Config) -> Option<SessionStore> {
    let path = match &config.session_db {
        Some(path) => Ok(path.clone()),
        None => SessionStore::default_path(),
    };

    match path.and_then(|path| SessionStore::open(&path)) {
        Ok(store) => {
            log::debug!("Session database at {}", store.path().display());
            Some(store)
        }
        Err(e) => {
            log::error!("Session persistence disabled: {}", e);
            None
        }
    }
}

fn main() -> iced::Result {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str())).init();

    let api = match ApiClient::new(&config.api_url) {
        Ok(api) => api,
        Err(e) => {
            log::error!("Cannot use API URL {:?}: {}", config.api_url, e);
            std::process::exit(2);
        }
    };
    log::info!("🎨 Photo Share starting against {}", api.base_url());

    let auth = AuthContext::new(api, open_session_store(&config));

    iced::application("Photo Share", PhotoShare::update, PhotoShare::view)
        .theme(PhotoShare::theme)
        .centered()
        .run_with(move || PhotoShare::new(auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use state::data::{AuthSession, Role, User};

    fn app() -> PhotoShare {
        let api = ApiClient::new("http://localhost:5000/api").unwrap();
        PhotoShare::new(AuthContext::new(api, None)).0
    }

    fn session(role: Role) -> AuthSession {
        AuthSession {
            token: "tok".to_string(),
            user: User {
                id: "u1".to_string(),
                username: "ana".to_string(),
                email: None,
                role,
            },
        }
    }

    #[test]
    fn test_gated_route_sends_anonymous_to_login() {
        let mut app = app();
        assert_eq!(app.screen.route(), Route::Home);

        let _ = app.navigate(Route::CreatorUpload);
        assert_eq!(app.screen.route(), Route::Login);
    }

    #[test]
    fn test_login_success_signs_in_and_goes_home() {
        let mut app = app();
        let _ = app.navigate(Route::Login);

        let completed = login::Message::Completed(Ok(session(Role::Creator)));
        let _ = app.update(Message::Login(completed));
        assert_eq!(app.screen.route(), Route::Home);
        assert!(app.auth.has_role(Role::Creator));

        let _ = app.navigate(Route::CreatorUpload);
        assert_eq!(app.screen.route(), Route::CreatorUpload);
    }

    #[test]
    fn test_sign_out_reruns_guard_on_open_route() {
        let mut app = app();
        let _ = app.apply(Action::<home::Message>::SignedIn(session(Role::Consumer)), Message::Home);
        let _ = app.navigate(Route::Consumer);
        assert_eq!(app.screen.route(), Route::Consumer);

        let _ = app.apply(Action::<consumer::Message>::SignedOut, Message::Consumer);
        assert!(app.auth.user().is_none());
        assert_eq!(app.screen.route(), Route::Login);
    }

    #[test]
    fn test_sign_out_reloads_open_photo_in_place() {
        let mut app = app();
        let _ = app.apply(Action::<home::Message>::SignedIn(session(Role::Consumer)), Message::Home);
        let _ = app.navigate(Route::PhotoDetail("p1".to_string()));

        let draft = photo_detail::Message::CommentChanged("Lovely light".to_string());
        let _ = app.update(Message::PhotoDetail(draft));
        let _ = app.apply(Action::<photo_detail::Message>::SignedOut, Message::PhotoDetail);

        // Same page instance: the draft survives, only the data is re-fetched
        match &app.screen {
            Screen::PhotoDetail(page) => {
                assert_eq!(page.photo_id(), "p1");
                assert_eq!(page.comment_text(), "Lovely light");
            }
            _ => panic!("expected the photo detail page to stay open"),
        }
        assert!(app.auth.user().is_none());
    }

    #[test]
    fn test_message_for_closed_screen_is_dropped() {
        let mut app = app();
        let late = login::Message::Completed(Ok(session(Role::Creator)));
        let _ = app.update(Message::Login(late));

        assert_eq!(app.screen.route(), Route::Home);
        assert!(app.auth.user().is_none());
    }
}
