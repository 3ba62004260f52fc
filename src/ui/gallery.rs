/// Paginated photo listing shared by the Home and Consumer pages
///
/// Re-queries the server whenever page, sort key or search term changes.
/// Listing failures are only logged: the previous photos stay on screen.
use std::collections::HashMap;

use iced::widget::image::Handle;
use iced::widget::{column, pick_list, row, text_input, Column, Row};
use iced::{Alignment, Element, Length, Task};

use super::{widgets, Action};
use crate::api::ApiError;
use crate::media;
use crate::routes::Route;
use crate::state::auth::AuthContext;
use crate::state::data::{Photo, PhotoPage};
use crate::state::listing::{ListingQuery, SortKey};
use crate::state::request::{RequestSeq, Ticket};

#[derive(Debug, Clone)]
pub enum Message {
    SearchChanged(String),
    SearchSubmitted,
    SortSelected(SortKey),
    PreviousPage,
    NextPage,
    Loaded(Ticket, Result<PhotoPage, ApiError>),
    ThumbnailLoaded(Ticket, String, Result<Handle, String>),
    Open(String),
}

/// What the listing body currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingBody {
    Loading,
    Empty,
    Photos { pagination: bool },
}

#[derive(Debug, Default)]
pub struct Gallery {
    query: ListingQuery,
    photos: Vec<Photo>,
    /// Thumbnails of the photos currently listed, keyed by photo ID
    thumbnails: HashMap<String, Handle>,
    loading: bool,
    requests: RequestSeq,
}

impl Gallery {
    pub fn new() -> Self {
        Gallery {
            query: ListingQuery::new(),
            ..Self::default()
        }
    }

    /// Issue a listing query for the current page, sort key and search term
    pub fn refresh(&mut self, auth: &AuthContext) -> Task<Message> {
        let ticket = self.requests.issue();
        let params = self.query.params();
        let api = auth.api().clone();
        self.loading = true;

        log::debug!("Listing photos: {:?}", params);

        Task::perform(
            async move { api.list_photos(&params).await },
            move |result| Message::Loaded(ticket, result),
        )
    }

    pub fn update(&mut self, message: Message, auth: &AuthContext) -> Action<Message> {
        match message {
            Message::SearchChanged(term) => {
                if self.query.set_search(term) {
                    return Action::Run(self.refresh(auth));
                }
                Action::None
            }
            Message::SearchSubmitted => {
                self.query.submit_search();
                Action::Run(self.refresh(auth))
            }
            Message::SortSelected(sort_by) => {
                if self.query.set_sort_by(sort_by) {
                    return Action::Run(self.refresh(auth));
                }
                Action::None
            }
            Message::PreviousPage => {
                if self.query.previous() {
                    return Action::Run(self.refresh(auth));
                }
                Action::None
            }
            Message::NextPage => {
                if self.query.next() {
                    return Action::Run(self.refresh(auth));
                }
                Action::None
            }
            Message::Loaded(ticket, result) => {
                if !self.requests.is_current(ticket) {
                    log::debug!("Dropping stale listing response {:?}", ticket);
                    return Action::None;
                }
                self.loading = false;

                match result {
                    Ok(page) => {
                        log::info!(
                            "📸 Listed {} photos (page {} of {})",
                            page.photos.len(),
                            self.query.page(),
                            page.pagination.pages
                        );
                        self.query.set_total_pages(page.pagination.pages);
                        self.photos = page.photos;
                        self.thumbnails.clear();
                        Action::Run(self.load_thumbnails(ticket, auth))
                    }
                    Err(e) => {
                        // Previous photos stay on screen; nothing is shown to the user
                        log::error!("Error fetching photos: {}", e);
                        Action::None
                    }
                }
            }
            Message::ThumbnailLoaded(ticket, photo_id, result) => {
                if !self.requests.is_current(ticket) {
                    return Action::None;
                }
                match result {
                    Ok(handle) => {
                        self.thumbnails.insert(photo_id, handle);
                    }
                    Err(e) => log::error!("Error loading thumbnail for {}: {}", photo_id, e),
                }
                Action::None
            }
            Message::Open(photo_id) => Action::Navigate(Route::PhotoDetail(photo_id)),
        }
    }

    fn load_thumbnails(&self, ticket: Ticket, auth: &AuthContext) -> Task<Message> {
        Task::batch(self.photos.iter().map(|photo| {
            let api = auth.api().clone();
            let image_url = photo.image_url.clone();
            let photo_id = photo.id.clone();

            Task::perform(
                async move {
                    let bytes = api.fetch_image(&image_url).await.map_err(|e| e.to_string())?;
                    media::thumbnail(bytes).await.map_err(|e| e.to_string())
                },
                move |result| Message::ThumbnailLoaded(ticket, photo_id.clone(), result),
            )
        }))
    }

    pub fn body(&self) -> ListingBody {
        if self.loading {
            ListingBody::Loading
        } else if self.photos.is_empty() {
            ListingBody::Empty
        } else {
            ListingBody::Photos {
                pagination: self.query.shows_pagination(),
            }
        }
    }

    // ========== View ==========

    pub fn search_bar(&self) -> Element<'_, Message> {
        text_input("Search photos...", self.query.search())
            .on_input(Message::SearchChanged)
            .on_submit(Message::SearchSubmitted)
            .padding(10)
            .width(Length::Fill)
            .into()
    }

    pub fn sort_picker(&self) -> Element<'_, Message> {
        pick_list(SortKey::ALL, Some(self.query.sort_by()), Message::SortSelected).into()
    }

    /// Loading notice, "No photos found", or the grid with its pagination bar
    pub fn listing(&self) -> Element<'_, Message> {
        match self.body() {
            ListingBody::Loading => widgets::notice("Loading photos..."),
            ListingBody::Empty => widgets::notice("No photos found"),
            ListingBody::Photos { pagination } => {
                let cards = self.photos.iter().map(|photo| {
                    widgets::photo_card(
                        photo,
                        self.thumbnails.get(&photo.id),
                        Message::Open(photo.id.clone()),
                    )
                });
                let grid = Row::with_children(cards).spacing(16).wrap();

                let mut content: Column<'_, Message> = column![grid]
                    .spacing(24)
                    .align_x(Alignment::Center)
                    .width(Length::Fill);
                if pagination {
                    content = content.push(widgets::pagination_bar(
                        &self.query,
                        Message::PreviousPage,
                        Message::NextPage,
                    ));
                }
                content.into()
            }
        }
    }

    /// Search field, search button and sort picker on one line
    pub fn filters(&self) -> Element<'_, Message> {
        row![
            self.search_bar(),
            iced::widget::button("Search").on_press(Message::SearchSubmitted),
            self.sort_picker(),
        ]
        .spacing(12)
        .align_y(Alignment::Center)
        .into()
    }
}
