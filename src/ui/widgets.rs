/// View helpers shared by several pages
use chrono::{DateTime, Local, Utc};
use iced::widget::image::{self, Handle};
use iced::widget::{button, column, container, row, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::data::Photo;
use crate::state::listing::ListingQuery;

/// Width of a photo card in the grid
const CARD_WIDTH: f32 = 240.0;
/// Height of the picture area of a photo card
const CARD_IMAGE_HEIGHT: f32 = 180.0;

/// Average rating with one decimal, as shown on cards and the detail page
pub fn format_rating(average: f64) -> String {
    format!("{:.1}", average)
}

/// Calendar date in the local timezone
pub fn format_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// The shared error slot: server failures and local validation both land here
pub fn error_banner<'a, M: 'a>(message: &'a str) -> Element<'a, M> {
    container(text(message).style(text::danger))
        .padding(10)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// A centered one-line notice ("Loading...", "No photos found", ...)
pub fn notice<'a, M: 'a>(message: &'a str) -> Element<'a, M> {
    container(text(message).size(18).style(text::secondary))
        .padding(40)
        .center_x(Length::Fill)
        .into()
}

/// Picture area for a photo, or a placeholder while it is missing
pub fn picture<'a, M: 'a>(handle: Option<&Handle>, width: f32, height: f32) -> Element<'a, M> {
    match handle {
        Some(handle) => image::Image::<Handle>::new(handle.clone())
            .width(Length::Fixed(width))
            .height(Length::Fixed(height))
            .content_fit(ContentFit::Cover)
            .into(),
        None => container(text("🖼").size(32).style(text::secondary))
            .center_x(Length::Fixed(width))
            .center_y(Length::Fixed(height))
            .style(container::rounded_box)
            .into(),
    }
}

/// A clickable grid card: picture, title, creator and stats
pub fn photo_card<'a, M: Clone + 'a>(
    photo: &'a Photo,
    thumbnail: Option<&Handle>,
    on_open: M,
) -> Element<'a, M> {
    let stats = row![
        text(format!("⭐ {}", format_rating(photo.average_rating))).size(14),
        text(format!("👁️ {}", photo.views)).size(14),
    ]
    .spacing(12);

    let info = column![
        text(&photo.title).size(18),
        text(format!("by {}", photo.creator.username))
            .size(14)
            .style(text::secondary),
        stats,
    ]
    .spacing(4)
    .width(Length::Fixed(CARD_WIDTH));

    button(column![picture(thumbnail, CARD_WIDTH, CARD_IMAGE_HEIGHT), info].spacing(8))
        .on_press(on_open)
        .padding(8)
        .style(button::secondary)
        .into()
}

/// Previous / "Page x of y" / Next, with each button disabled at its boundary
pub fn pagination_bar<'a, M: Clone + 'a>(
    query: &ListingQuery,
    on_previous: M,
    on_next: M,
) -> Element<'a, M> {
    row![
        button("Previous").on_press_maybe(query.has_previous().then_some(on_previous)),
        text(format!("Page {} of {}", query.page(), query.total_pages())),
        button("Next").on_press_maybe(query.has_next().then_some(on_next)),
    ]
    .spacing(16)
    .align_y(Alignment::Center)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rating_one_decimal() {
        assert_eq!(format_rating(0.0), "0.0");
        assert_eq!(format_rating(3.666), "3.7");
        assert_eq!(format_rating(5.0), "5.0");
    }
}
