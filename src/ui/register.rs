/// Registration page: account details and role against `POST /auth/register`
use iced::widget::{button, column, container, pick_list, row, text, text_input, Column};
use iced::{Alignment, Element, Length, Task};

use super::{widgets, Action};
use crate::api::{ApiError, RegisterRequest};
use crate::routes::Route;
use crate::state::auth::AuthContext;
use crate::state::data::{AuthSession, Role};

#[derive(Debug, Clone)]
pub enum Message {
    UsernameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    RoleSelected(Role),
    Submit,
    Completed(Result<AuthSession, ApiError>),
    Navigate(Route),
}

#[derive(Debug)]
pub struct Register {
    username: String,
    email: String,
    password: String,
    role: Role,
    submitting: bool,
    error: Option<String>,
}

impl Default for Register {
    fn default() -> Self {
        Register {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Consumer,
            submitting: false,
            error: None,
        }
    }
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: Message, auth: &AuthContext) -> Action<Message> {
        match message {
            Message::UsernameChanged(username) => self.username = username,
            Message::EmailChanged(email) => self.email = email,
            Message::PasswordChanged(password) => self.password = password,
            Message::RoleSelected(role) => self.role = role,
            Message::Submit => return self.submit(auth),
            Message::Completed(result) => {
                self.submitting = false;
                match result {
                    Ok(session) => {
                        self.password.clear();
                        return Action::SignedIn(session);
                    }
                    Err(e) => {
                        log::error!("Registration failed: {}", e);
                        self.error = Some(e.user_message("Registration failed"));
                    }
                }
            }
            Message::Navigate(route) => return Action::Navigate(route),
        }
        Action::None
    }

    fn submit(&mut self, auth: &AuthContext) -> Action<Message> {
        if self.submitting {
            return Action::None;
        }
        let blank = [&self.username, &self.email]
            .iter()
            .any(|field| field.trim().is_empty())
            || self.password.is_empty();
        if blank {
            self.error = Some("Please fill in all fields".to_string());
            return Action::None;
        }

        self.submitting = true;
        self.error = None;
        let request = RegisterRequest {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
        };
        Action::Run(Task::perform(auth.register(request), Message::Completed))
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut form: Column<'_, Message> = column![text("Register").size(32)]
            .spacing(14)
            .max_width(420);

        if let Some(error) = &self.error {
            form = form.push(widgets::error_banner(error));
        }

        let label = if self.submitting { "Creating account..." } else { "Register" };
        form = form
            .push(
                text_input("Username", &self.username)
                    .on_input(Message::UsernameChanged)
                    .padding(10),
            )
            .push(
                text_input("Email", &self.email)
                    .on_input(Message::EmailChanged)
                    .padding(10),
            )
            .push(
                text_input("Password", &self.password)
                    .on_input(Message::PasswordChanged)
                    .on_submit(Message::Submit)
                    .secure(true)
                    .padding(10),
            )
            .push(
                row![
                    text("I want to"),
                    pick_list(Role::ALL, Some(self.role), Message::RoleSelected),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            )
            .push(
                button(label)
                    .on_press_maybe((!self.submitting).then_some(Message::Submit))
                    .width(Length::Fill),
            )
            .push(
                row![
                    text("Already have an account?").style(text::secondary),
                    button("Login")
                        .on_press(Message::Navigate(Route::Login))
                        .style(button::text),
                ]
                .align_y(Alignment::Center),
            )
            .push(
                button("← Home")
                    .on_press(Message::Navigate(Route::Home))
                    .style(button::text),
            );

        container(form)
            .padding(40)
            .center_x(Length::Fill)
            .into()
    }
}
