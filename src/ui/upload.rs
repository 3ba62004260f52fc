/// Creator upload page
///
/// Collects the photo form, validates it locally and posts it as multipart.
use iced::widget::{button, column, container, row, scrollable, text, text_input, Column, Row};
use iced::{Alignment, Element, Length, Task};

use super::{widgets, Action};
use crate::api::ApiError;
use crate::media::{self, MediaError, SelectedImage, UPLOAD_EXTENSIONS};
use crate::routes::Route;
use crate::state::auth::AuthContext;
use crate::state::data::Photo;
use crate::state::upload::UploadForm;

#[derive(Debug, Clone)]
pub enum Message {
    TitleChanged(String),
    CaptionChanged(String),
    LocationChanged(String),
    PersonInputChanged(String),
    AddPerson,
    RemovePerson(String),
    PickImage,
    /// None when the dialog was dismissed
    ImagePicked(Option<Result<SelectedImage, MediaError>>),
    RemoveImage,
    Submit,
    Uploaded(Result<Photo, ApiError>),
    Cancel,
}

#[derive(Debug, Default)]
pub struct UploadPage {
    form: UploadForm,
    submitting: bool,
    error: Option<String>,
}

impl UploadPage {
    pub fn new() -> Self {
        UploadPage {
            form: UploadForm::new(),
            ..Self::default()
        }
    }

    pub fn update(&mut self, message: Message, auth: &AuthContext) -> Action<Message> {
        match message {
            Message::TitleChanged(title) => self.form.set_title(title),
            Message::CaptionChanged(caption) => self.form.set_caption(caption),
            Message::LocationChanged(location) => self.form.set_location(location),
            Message::PersonInputChanged(input) => self.form.set_person_input(input),
            Message::AddPerson => {
                self.form.commit_person_input();
            }
            Message::RemovePerson(name) => self.form.remove_person(&name),
            Message::PickImage => {
                return Action::Run(Task::perform(pick_image(), Message::ImagePicked));
            }
            Message::ImagePicked(None) => {}
            Message::ImagePicked(Some(Ok(image))) => {
                self.error = None;
                self.form.set_image(image);
            }
            Message::ImagePicked(Some(Err(e))) => {
                log::warn!("⚠️  Rejected picked file: {}", e);
                self.error = Some(e.to_string());
            }
            Message::RemoveImage => self.form.clear_image(),
            Message::Submit => return self.submit(auth),
            Message::Uploaded(result) => {
                self.submitting = false;
                match result {
                    Ok(photo) => {
                        log::info!("✅ Uploaded \"{}\" ({})", photo.title, photo.id);
                        return Action::Navigate(Route::Home);
                    }
                    Err(e) => {
                        log::error!("Upload failed: {}", e);
                        self.error = Some(e.user_message("Upload failed"));
                    }
                }
            }
            Message::Cancel => return Action::Navigate(Route::Home),
        }
        Action::None
    }

    fn submit(&mut self, auth: &AuthContext) -> Action<Message> {
        if self.submitting {
            return Action::None;
        }
        self.error = None;

        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.to_string());
                return Action::None;
            }
        };

        self.submitting = true;
        let api = auth.api().clone();
        Action::Run(Task::perform(
            async move { api.upload_photo(&request).await },
            Message::Uploaded,
        ))
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut content: Column<'_, Message> = column![text("Upload Photo").size(32)].spacing(16);

        if let Some(error) = &self.error {
            content = content.push(widgets::error_banner(error));
        }

        content = content
            .push(labelled("Image *", self.image_picker()))
            .push(labelled(
                "Title *",
                text_input("Title", self.form.title())
                    .on_input(Message::TitleChanged)
                    .padding(10)
                    .into(),
            ))
            .push(labelled(
                "Caption",
                text_input("Caption", self.form.caption())
                    .on_input(Message::CaptionChanged)
                    .padding(10)
                    .into(),
            ))
            .push(labelled(
                "Location",
                text_input("Location", self.form.location())
                    .on_input(Message::LocationChanged)
                    .padding(10)
                    .into(),
            ))
            .push(labelled("People", self.people_editor()));

        let submit_label = if self.submitting { "Uploading..." } else { "Upload Photo" };
        content = content.push(
            row![
                button(submit_label).on_press_maybe((!self.submitting).then_some(Message::Submit)),
                button("Cancel")
                    .on_press(Message::Cancel)
                    .style(button::secondary),
            ]
            .spacing(12),
        );

        scrollable(container(content.max_width(720)).padding(24).center_x(Length::Fill)).into()
    }

    fn image_picker(&self) -> Element<'_, Message> {
        match self.form.image() {
            Some(image) => column![
                widgets::picture(image.preview.as_ref(), 480.0, 320.0),
                row![
                    text(&image.file_name).size(14),
                    button("Remove")
                        .on_press(Message::RemoveImage)
                        .style(button::danger),
                ]
                .spacing(12)
                .align_y(Alignment::Center),
            ]
            .spacing(8)
            .into(),
            None => button("Choose Image").on_press(Message::PickImage).into(),
        }
    }

    fn people_editor(&self) -> Element<'_, Message> {
        let input = row![
            text_input("Add person name", self.form.person_input())
                .on_input(Message::PersonInputChanged)
                .on_submit(Message::AddPerson)
                .padding(10),
            button("Add").on_press(Message::AddPerson),
        ]
        .spacing(8);

        let tags = Row::with_children(self.form.people().iter().map(|person| {
            container(
                row![
                    text(person),
                    button("×")
                        .on_press(Message::RemovePerson(person.clone()))
                        .style(button::text)
                        .padding(0),
                ]
                .spacing(6)
                .align_y(Alignment::Center),
            )
            .padding([4, 10])
            .style(container::rounded_box)
            .into()
        }))
        .spacing(8)
        .wrap();

        column![input, tags].spacing(8).into()
    }
}

fn labelled<'a>(label: &'a str, field: Element<'a, Message>) -> Element<'a, Message> {
    column![text(label).size(14), field].spacing(6).into()
}

/// Show the native picker and load the chosen file
async fn pick_image() -> Option<Result<SelectedImage, MediaError>> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title("Select a photo")
        .add_filter("Images", &UPLOAD_EXTENSIONS)
        .pick_file()
        .await?;

    Some(media::load_selected_image(handle.path().to_path_buf()).await)
}
