/// Home page: header with account actions, search hero and the public listing
use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::{Alignment, Element, Length, Task};

use super::gallery::{self, Gallery};
use super::Action;
use crate::routes::Route;
use crate::state::auth::AuthContext;
use crate::state::data::Role;

#[derive(Debug, Clone)]
pub enum Message {
    Gallery(gallery::Message),
    Navigate(Route),
    Logout,
}

#[derive(Debug)]
pub struct Home {
    gallery: Gallery,
}

impl Home {
    pub fn new() -> Self {
        Home {
            gallery: Gallery::new(),
        }
    }

    /// Fetch the first listing page
    pub fn open(&mut self, auth: &AuthContext) -> Task<Message> {
        self.gallery.refresh(auth).map(Message::Gallery)
    }

    pub fn update(&mut self, message: Message, auth: &AuthContext) -> Action<Message> {
        match message {
            Message::Gallery(message) => self.gallery.update(message, auth).map(Message::Gallery),
            Message::Navigate(route) => Action::Navigate(route),
            Message::Logout => Action::SignedOut,
        }
    }

    pub fn view<'a>(&'a self, auth: &'a AuthContext) -> Element<'a, Message> {
        let hero = column![
            text("Discover Amazing Photos").size(32),
            text("Explore a world of creativity and inspiration").size(16),
            container(
                row![
                    self.gallery.search_bar().map(Message::Gallery),
                    button("Search").on_press(Message::Gallery(gallery::Message::SearchSubmitted)),
                ]
                .spacing(12),
            )
            .max_width(600),
        ]
        .spacing(12)
        .align_x(Alignment::Center);

        let content = column![
            header(auth),
            container(hero).padding(24).center_x(Length::Fill),
            row![
                Space::with_width(Length::Fill),
                self.gallery.sort_picker().map(Message::Gallery),
            ],
            self.gallery.listing().map(Message::Gallery),
        ]
        .spacing(20)
        .padding(24);

        scrollable(content).into()
    }
}

/// Title bar with login/register, or the signed-in user's actions
fn header(auth: &AuthContext) -> Element<'_, Message> {
    let actions = match auth.user() {
        Some(user) => {
            let mut actions = row![text(format!("Welcome, {}", user.username))]
                .spacing(12)
                .align_y(Alignment::Center);
            actions = match user.role {
                Role::Creator => actions.push(
                    button("Upload Photo").on_press(Message::Navigate(Route::CreatorUpload)),
                ),
                Role::Consumer => actions
                    .push(button("Browse Photos").on_press(Message::Navigate(Route::Consumer))),
            };
            actions.push(
                button("Logout")
                    .on_press(Message::Logout)
                    .style(button::secondary),
            )
        }
        None => row![
            button("Login")
                .on_press(Message::Navigate(Route::Login))
                .style(button::secondary),
            button("Register").on_press(Message::Navigate(Route::Register)),
        ]
        .spacing(12),
    };

    row![
        text("Photo Share").size(28),
        Space::with_width(Length::Fill),
        actions,
    ]
    .align_y(Alignment::Center)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;

    #[test]
    fn test_logout_is_reported_to_the_app() {
        let auth = AuthContext::new(ApiClient::new("http://localhost:5000/api").unwrap(), None);
        let mut home = Home::new();
        assert!(matches!(home.update(Message::Logout, &auth), Action::SignedOut));
    }

    #[test]
    fn test_gallery_navigation_bubbles_up() {
        let auth = AuthContext::new(ApiClient::new("http://localhost:5000/api").unwrap(), None);
        let mut home = Home::new();
        let action = home.update(Message::Gallery(gallery::Message::Open("p1".to_string())), &auth);
        assert!(matches!(action, Action::Navigate(Route::PhotoDetail(_))));
    }
}
