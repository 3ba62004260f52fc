/// Login page: email and password against `POST /auth/login`
use iced::widget::{button, column, container, row, text, text_input, Column};
use iced::{Alignment, Element, Length, Task};

use super::{widgets, Action};
use crate::api::{ApiError, LoginRequest};
use crate::routes::Route;
use crate::state::auth::AuthContext;
use crate::state::data::AuthSession;

#[derive(Debug, Clone)]
pub enum Message {
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    Completed(Result<AuthSession, ApiError>),
    Navigate(Route),
}

#[derive(Debug, Default)]
pub struct Login {
    email: String,
    password: String,
    submitting: bool,
    error: Option<String>,
}

impl Login {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, message: Message, auth: &AuthContext) -> Action<Message> {
        match message {
            Message::EmailChanged(email) => self.email = email,
            Message::PasswordChanged(password) => self.password = password,
            Message::Submit => {
                if self.submitting {
                    return Action::None;
                }
                if self.email.trim().is_empty() || self.password.is_empty() {
                    self.error = Some("Please enter your email and password".to_string());
                    return Action::None;
                }

                self.submitting = true;
                self.error = None;
                let request = LoginRequest {
                    email: self.email.trim().to_string(),
                    password: self.password.clone(),
                };
                return Action::Run(Task::perform(auth.login(request), Message::Completed));
            }
            Message::Completed(result) => {
                self.submitting = false;
                match result {
                    Ok(session) => {
                        self.password.clear();
                        return Action::SignedIn(session);
                    }
                    Err(e) => {
                        log::error!("Login failed: {}", e);
                        self.error = Some(e.user_message("Login failed"));
                    }
                }
            }
            Message::Navigate(route) => return Action::Navigate(route),
        }
        Action::None
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut form: Column<'_, Message> = column![text("Login").size(32)]
            .spacing(14)
            .max_width(420);

        if let Some(error) = &self.error {
            form = form.push(widgets::error_banner(error));
        }

        let label = if self.submitting { "Logging in..." } else { "Login" };
        form = form
            .push(
                text_input("Email", &self.email)
                    .on_input(Message::EmailChanged)
                    .on_submit(Message::Submit)
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
                button(label)
                    .on_press_maybe((!self.submitting).then_some(Message::Submit))
                    .width(Length::Fill),
            )
            .push(
                row![
                    text("Don't have an account?").style(text::secondary),
                    button("Register")
                        .on_press(Message::Navigate(Route::Register))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;

    fn auth() -> AuthContext {
        AuthContext::new(ApiClient::new("http://localhost:5000/api").unwrap(), None)
    }

    #[test]
    fn test_blank_fields_fail_locally() {
        let auth = auth();
        let mut login = Login::new();
        login.update(Message::EmailChanged("ana@example.com".to_string()), &auth);

        assert!(matches!(login.update(Message::Submit, &auth), Action::None));
        assert_eq!(login.error.as_deref(), Some("Please enter your email and password"));
    }

    #[test]
    fn test_filled_form_dispatches_login() {
        let auth = auth();
        let mut login = Login::new();
        login.update(Message::EmailChanged("ana@example.com".to_string()), &auth);
        login.update(Message::PasswordChanged("hunter2".to_string()), &auth);

        assert!(matches!(login.update(Message::Submit, &auth), Action::Run(_)));
        assert!(matches!(login.update(Message::Submit, &auth), Action::None));
    }

    #[test]
    fn test_failure_shows_server_message_or_fallback() {
        let auth = auth();
        let mut login = Login::new();

        login.update(
            Message::Completed(Err(ApiError::Rejected {
                status: 401,
                message: Some("Invalid credentials".to_string()),
            })),
            &auth,
        );
        assert_eq!(login.error.as_deref(), Some("Invalid credentials"));

        login.update(
            Message::Completed(Err(ApiError::Decode("eof".to_string()))),
            &auth,
        );
        assert_eq!(login.error.as_deref(), Some("Login failed"));
    }
}
