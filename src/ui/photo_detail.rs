/// Photo detail page
///
/// Shows one photo with its metadata and comments. Consumers can rate the
/// photo and comment on it; authors see a delete control on their comments.
/// Photo, comments and the user's rating each have their own request
/// sequence so a re-fetch of one never invalidates the others.
use iced::font::{self, Font};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, scrollable, text, text_input, Column, Row};
use iced::{Alignment, Element, Length, Task, Theme};

use super::{widgets, Action};
use crate::api::ApiError;
use crate::media;
use crate::routes::Route;
use crate::state::auth::AuthContext;
use crate::state::data::{Comment, Photo, RatingValue, Role};
use crate::state::request::{RequestSeq, Ticket};
use crate::state::upload::limit_chars;

pub const COMMENT_MAX_CHARS: usize = 500;

const IMAGE_WIDTH: f32 = 640.0;
const IMAGE_HEIGHT: f32 = 480.0;

#[derive(Debug, Clone)]
pub enum Message {
    PhotoLoaded(Ticket, Result<Photo, ApiError>),
    CommentsLoaded(Ticket, Result<Vec<Comment>, ApiError>),
    UserRatingLoaded(Ticket, Result<Option<RatingValue>, ApiError>),
    ImageLoaded(Ticket, Result<Handle, String>),
    Rate(RatingValue),
    Rated(RatingValue, Result<(), ApiError>),
    CommentChanged(String),
    SubmitComment,
    CommentPosted(Result<Comment, ApiError>),
    DeleteComment(String),
    CommentDeleted(Result<(), ApiError>),
    Back,
}

#[derive(Debug)]
pub struct PhotoDetail {
    photo_id: String,
    photo: Option<Photo>,
    image: Option<Handle>,
    comments: Vec<Comment>,
    user_rating: Option<RatingValue>,
    comment_text: String,
    loading: bool,
    submitting: bool,
    error: Option<String>,
    photo_requests: RequestSeq,
    comment_requests: RequestSeq,
    rating_requests: RequestSeq,
    image_requests: RequestSeq,
}

impl PhotoDetail {
    pub fn new(photo_id: String) -> Self {
        PhotoDetail {
            photo_id,
            photo: None,
            image: None,
            comments: Vec::new(),
            user_rating: None,
            comment_text: String::new(),
            loading: true,
            submitting: false,
            error: None,
            photo_requests: RequestSeq::new(),
            comment_requests: RequestSeq::new(),
            rating_requests: RequestSeq::new(),
            image_requests: RequestSeq::new(),
        }
    }

    pub fn photo_id(&self) -> &str {
        &self.photo_id
    }

    #[cfg(test)]
    pub fn comment_text(&self) -> &str {
        &self.comment_text
    }

    /// Finished loading without a photo to show
    pub fn is_not_found(&self) -> bool {
        !self.loading && self.photo.is_none()
    }

    /// Fetch photo, comments and (for consumers) the user's rating together.
    ///
    /// Also called when the signed-in user changes while the page is open.
    pub fn reload(&mut self, auth: &AuthContext) -> Task<Message> {
        log::info!("🔍 Opening photo {}", self.photo_id);

        let mut tasks = vec![self.fetch_photo(auth), self.fetch_comments(auth)];
        if auth.has_role(Role::Consumer) {
            tasks.push(self.fetch_user_rating(auth));
        } else {
            // Invalidate a rating fetch still in flight for a previous user
            self.rating_requests.issue();
            self.user_rating = None;
        }
        Task::batch(tasks)
    }

    fn fetch_photo(&mut self, auth: &AuthContext) -> Task<Message> {
        let ticket = self.photo_requests.issue();
        let api = auth.api().clone();
        let photo_id = self.photo_id.clone();
        Task::perform(
            async move { api.get_photo(&photo_id).await },
            move |result| Message::PhotoLoaded(ticket, result),
        )
    }

    fn fetch_comments(&mut self, auth: &AuthContext) -> Task<Message> {
        let ticket = self.comment_requests.issue();
        let api = auth.api().clone();
        let photo_id = self.photo_id.clone();
        Task::perform(
            async move { api.list_comments(&photo_id).await },
            move |result| Message::CommentsLoaded(ticket, result),
        )
    }

    fn fetch_user_rating(&mut self, auth: &AuthContext) -> Task<Message> {
        let ticket = self.rating_requests.issue();
        let api = auth.api().clone();
        let photo_id = self.photo_id.clone();
        Task::perform(
            async move { api.get_user_rating(&photo_id).await },
            move |result| Message::UserRatingLoaded(ticket, result),
        )
    }

    fn fetch_image(&mut self, image_url: String, auth: &AuthContext) -> Task<Message> {
        let ticket = self.image_requests.issue();
        let api = auth.api().clone();
        Task::perform(
            async move {
                let bytes = api.fetch_image(&image_url).await.map_err(|e| e.to_string())?;
                media::preview(bytes).await.map_err(|e| e.to_string())
            },
            move |result| Message::ImageLoaded(ticket, result),
        )
    }

    pub fn update(&mut self, message: Message, auth: &AuthContext) -> Action<Message> {
        match message {
            Message::PhotoLoaded(ticket, result) => {
                if !self.photo_requests.is_current(ticket) {
                    log::debug!("Dropping stale photo response {:?}", ticket);
                    return Action::None;
                }
                self.loading = false;

                match result {
                    Ok(photo) => {
                        let image_changed = self
                            .photo
                            .as_ref()
                            .map_or(true, |current| current.image_url != photo.image_url);
                        let image_url = photo.image_url.clone();
                        self.photo = Some(photo);

                        if image_changed || self.image.is_none() {
                            self.image = None;
                            return Action::Run(self.fetch_image(image_url, auth));
                        }
                    }
                    Err(e) => log::error!("Error fetching photo {}: {}", self.photo_id, e),
                }
                Action::None
            }
            Message::CommentsLoaded(ticket, result) => {
                if !self.comment_requests.is_current(ticket) {
                    log::debug!("Dropping stale comments response {:?}", ticket);
                    return Action::None;
                }
                match result {
                    Ok(comments) => self.comments = comments,
                    Err(e) => log::error!("Error fetching comments: {}", e),
                }
                Action::None
            }
            Message::UserRatingLoaded(ticket, result) => {
                if !self.rating_requests.is_current(ticket) {
                    return Action::None;
                }
                match result {
                    Ok(Some(rating)) => self.user_rating = Some(rating),
                    Ok(None) => {}
                    Err(e) => log::error!("Error fetching rating: {}", e),
                }
                Action::None
            }
            Message::ImageLoaded(ticket, result) => {
                if !self.image_requests.is_current(ticket) {
                    return Action::None;
                }
                match result {
                    Ok(handle) => self.image = Some(handle),
                    Err(e) => log::error!("Error loading image for {}: {}", self.photo_id, e),
                }
                Action::None
            }
            Message::Rate(rating) => {
                if !auth.has_role(Role::Consumer) || self.submitting {
                    return Action::None;
                }
                self.submitting = true;
                self.error = None;
                // A rating fetch still in flight would report the old value
                self.rating_requests.issue();

                let api = auth.api().clone();
                let photo_id = self.photo_id.clone();
                Action::Run(Task::perform(
                    async move { api.submit_rating(&photo_id, rating).await },
                    move |result| Message::Rated(rating, result),
                ))
            }
            Message::Rated(rating, result) => {
                self.submitting = false;
                match result {
                    Ok(()) => {
                        log::info!("⭐ Rated {} with {}", self.photo_id, rating);
                        self.user_rating = Some(rating);
                        // Aggregates come from the server, never recomputed here
                        Action::Run(self.fetch_photo(auth))
                    }
                    Err(e) => {
                        log::error!("Rating failed: {}", e);
                        self.error = Some(e.user_message("Failed to submit rating"));
                        Action::None
                    }
                }
            }
            Message::CommentChanged(text) => {
                self.comment_text = limit_chars(text, COMMENT_MAX_CHARS);
                Action::None
            }
            Message::SubmitComment => self.submit_comment(auth),
            Message::CommentPosted(result) => {
                self.submitting = false;
                match result {
                    Ok(comment) => {
                        log::info!("💬 Posted comment {}", comment.id);
                        self.comment_text.clear();
                        Action::Run(self.fetch_comments(auth))
                    }
                    Err(e) => {
                        log::error!("Posting comment failed: {}", e);
                        self.error = Some(e.user_message("Failed to post comment"));
                        Action::None
                    }
                }
            }
            Message::DeleteComment(comment_id) => {
                self.error = None;
                let api = auth.api().clone();
                Action::Run(Task::perform(
                    async move { api.delete_comment(&comment_id).await },
                    Message::CommentDeleted,
                ))
            }
            Message::CommentDeleted(result) => match result {
                Ok(()) => Action::Run(self.fetch_comments(auth)),
                Err(e) => {
                    log::error!("Deleting comment failed: {}", e);
                    self.error = Some(e.user_message("Failed to delete comment"));
                    Action::None
                }
            },
            Message::Back => Action::Navigate(Route::Home),
        }
    }

    fn submit_comment(&mut self, auth: &AuthContext) -> Action<Message> {
        if !auth.has_role(Role::Consumer) || self.submitting {
            return Action::None;
        }
        if self.comment_text.trim().is_empty() {
            self.error = Some("Comment cannot be empty".to_string());
            return Action::None;
        }

        self.submitting = true;
        self.error = None;

        let api = auth.api().clone();
        let photo_id = self.photo_id.clone();
        let text = self.comment_text.clone();
        Action::Run(Task::perform(
            async move { api.post_comment(&photo_id, &text).await },
            Message::CommentPosted,
        ))
    }

    // ========== View ==========

    pub fn view<'a>(&'a self, auth: &'a AuthContext) -> Element<'a, Message> {
        let Some(photo) = &self.photo else {
            if !self.is_not_found() {
                return widgets::notice("Loading...");
            }
            return container(
                column![
                    text("Photo not found").size(22),
                    button("Go Home").on_press(Message::Back),
                ]
                .spacing(16)
                .align_x(Alignment::Center),
            )
            .padding(40)
            .center_x(Length::Fill)
            .into();
        };

        let content = row![
            widgets::picture(self.image.as_ref(), IMAGE_WIDTH, IMAGE_HEIGHT),
            self.info(photo, auth),
        ]
        .spacing(32);

        scrollable(container(content).padding(24)).into()
    }

    fn info<'a>(&'a self, photo: &'a Photo, auth: &'a AuthContext) -> Element<'a, Message> {
        let mut info: Column<'_, Message> = column![
            text(&photo.title).size(30),
            text(format!("by {}", photo.creator.username)).style(text::secondary),
        ]
        .spacing(12)
        .width(Length::Fill);

        if let Some(caption) = photo.caption.as_deref().filter(|c| !c.is_empty()) {
            info = info.push(text(caption));
        }

        info = info.push(metadata(photo));

        let is_consumer = auth.has_role(Role::Consumer);
        if is_consumer {
            info = info.push(self.rating_section());
        }

        info = info
            .push(self.comments_section(auth, is_consumer))
            .push(
                button("← Back to Gallery")
                    .on_press(Message::Back)
                    .style(button::text),
            );

        info.into()
    }

    fn rating_section(&self) -> Element<'_, Message> {
        let current = self.user_rating.map_or(0, RatingValue::get);
        let stars = RatingValue::all().map(|star| {
            let style: fn(&Theme, button::Status) -> button::Style = if star.get() <= current {
                button::primary
            } else {
                button::secondary
            };
            button(text("★"))
                .style(style)
                .on_press_maybe((!self.submitting).then_some(Message::Rate(star)))
                .into()
        });

        let mut line = Row::with_children(stars).spacing(4).align_y(Alignment::Center);
        if let Some(rating) = self.user_rating {
            line = line.push(text(format!("Your rating: {}/5", rating)).style(text::secondary));
        }

        column![text("Rate this photo").size(20), line].spacing(8).into()
    }

    fn comments_section<'a>(&'a self, auth: &'a AuthContext, can_comment: bool) -> Element<'a, Message> {
        let mut section: Column<'_, Message> =
            column![text(format!("Comments ({})", self.comments.len())).size(20)].spacing(12);

        if can_comment {
            let label = if self.submitting { "Posting..." } else { "Post Comment" };
            let can_post = !self.submitting && !self.comment_text.trim().is_empty();
            section = section.push(
                row![
                    text_input("Write a comment...", &self.comment_text)
                        .on_input(Message::CommentChanged)
                        .on_submit(Message::SubmitComment)
                        .padding(10),
                    button(label).on_press_maybe(can_post.then_some(Message::SubmitComment)),
                ]
                .spacing(8),
            );
        }

        if let Some(error) = &self.error {
            section = section.push(widgets::error_banner(error));
        }

        if self.comments.is_empty() {
            section = section.push(
                text("No comments yet. Be the first to comment!").style(text::secondary),
            );
        } else {
            for comment in &self.comments {
                section = section.push(comment_item(comment, auth.can_delete(comment)));
            }
        }

        section.into()
    }
}

fn metadata(photo: &Photo) -> Element<'_, Message> {
    let mut lines: Column<'_, Message> = column![].spacing(6);

    if let Some(location) = photo.location.as_deref().filter(|l| !l.is_empty()) {
        lines = lines.push(text(format!("📍 Location: {}", location)));
    }
    if !photo.people.is_empty() {
        lines = lines.push(text(format!("👥 People: {}", photo.people.join(", "))));
    }

    lines
        .push(text(format!("📅 Uploaded: {}", widgets::format_date(&photo.upload_date))))
        .push(text(format!("👁️ Views: {}", photo.views)))
        .push(text(format!(
            "⭐ Rating: {} ({} ratings)",
            widgets::format_rating(photo.average_rating),
            photo.total_ratings
        )))
        .into()
}

fn comment_item(comment: &Comment, deletable: bool) -> Element<'_, Message> {
    let bold = Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    };

    let mut item = column![
        row![
            text(&comment.user.username).font(bold),
            text(widgets::format_date(&comment.created_at))
                .size(12)
                .style(text::secondary),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
        text(&comment.text),
    ]
    .spacing(4);

    if deletable {
        item = item.push(
            button(text("Delete").size(12))
                .on_press(Message::DeleteComment(comment.id.clone()))
                .style(button::danger),
        );
    }

    container(item)
        .padding(10)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
