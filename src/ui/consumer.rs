/// Consumer browse page: the listing with inline search and sort
use iced::widget::{button, column, row, scrollable, text, Space};
use iced::{Alignment, Element, Length, Task};

use super::gallery::{self, Gallery};
use super::Action;
use crate::routes::Route;
use crate::state::auth::AuthContext;

#[derive(Debug, Clone)]
pub enum Message {
    Gallery(gallery::Message),
    Home,
}

#[derive(Debug)]
pub struct Consumer {
    gallery: Gallery,
}

impl Consumer {
    pub fn new() -> Self {
        Consumer {
            gallery: Gallery::new(),
        }
    }

    pub fn open(&mut self, auth: &AuthContext) -> Task<Message> {
        self.gallery.refresh(auth).map(Message::Gallery)
    }

    pub fn update(&mut self, message: Message, auth: &AuthContext) -> Action<Message> {
        match message {
            Message::Gallery(message) => self.gallery.update(message, auth).map(Message::Gallery),
            Message::Home => Action::Navigate(Route::Home),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let top = row![
            button("← Home").on_press(Message::Home).style(button::text),
            text("Browse Photos").size(28),
            Space::with_width(Length::Fill),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let content = column![
            top,
            self.gallery.filters().map(Message::Gallery),
            self.gallery.listing().map(Message::Gallery),
        ]
        .spacing(20)
        .padding(24);

        scrollable(content).into()
    }
}
