/// State management module
///
/// This module handles all client-side state, including:
/// - API records as the UI sees them (data.rs)
/// - The signed-in identity and its transitions (auth.rs)
/// - Session persistence between launches (session.rs)
/// - Listing pagination, sort and search (listing.rs)
/// - The upload form (upload.rs)
/// - Stale-response guarding for async fetches (request.rs)

pub mod auth;
pub mod data;
pub mod listing;
pub mod request;
pub mod session;
pub mod upload;
