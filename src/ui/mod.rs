/// User interface module
///
/// One submodule per screen, plus shared pieces:
/// - Photo listing used by Home and Consumer (gallery.rs)
/// - Reusable view helpers (widgets.rs)
///
/// Pages never touch the auth context mutably. They report what should
/// happen next through an [`Action`] and the application applies it.

pub mod consumer;
pub mod gallery;
pub mod home;
pub mod login;
pub mod photo_detail;
pub mod register;
pub mod upload;
pub mod widgets;

use iced::Task;

use crate::routes::Route;
use crate::state::data::AuthSession;

/// What a page asks the application to do after handling a message
pub enum Action<M> {
    None,
    /// Run async work whose result comes back to the page
    Run(Task<M>),
    Navigate(Route),
    SignedIn(AuthSession),
    SignedOut,
}

impl<M: Send + 'static> Action<M> {
    /// Re-wrap the page's messages, e.g. when a page embeds the gallery
    pub fn map<N: Send + 'static>(self, f: impl Fn(M) -> N + Send + 'static) -> Action<N> {
        match self {
            Action::None => Action::None,
            Action::Run(task) => Action::Run(task.map(f)),
            Action::Navigate(route) => Action::Navigate(route),
            Action::SignedIn(session) => Action::SignedIn(session),
            Action::SignedOut => Action::SignedOut,
        }
    }
}
