/// Shared data structures for the application state
///
/// These structs mirror the records returned by the photo API. They are
/// UI-scoped copies: the server owns every entity and the client only
/// re-fetches, it never edits them in place.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role attached to every account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May upload photos
    Creator,
    /// May browse, rate and comment
    Consumer,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Consumer, Role::Creator];

    /// Wire representation ("creator" / "consumer")
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Creator => "creator",
            Role::Consumer => "consumer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Creator => write!(f, "Creator"),
            Role::Consumer => write!(f, "Consumer"),
        }
    }
}

/// The signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account ID (`id` from the auth endpoints, `_id` elsewhere)
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

/// A populated reference to another account (photo creator, comment author)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
}

/// Represents a single photo as served by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Names of the people in the photo, in upload order
    #[serde(default)]
    pub people: Vec<String>,
    /// Absolute URL, or a path relative to the API origin
    pub image_url: String,
    pub creator: UserRef,
    #[serde(default)]
    pub views: u64,
    /// Server-derived aggregate, never recomputed locally
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_ratings: u64,
    pub upload_date: DateTime<Utc>,
}

/// The photo a comment belongs to, either as a bare ID or a populated record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhotoRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
    },
}


/// A comment left on a photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub photo: Option<PhotoRef>,
    /// Author of the comment
    pub user: UserRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A star rating between 1 and 5 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns None for anything outside 1..=5
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every valid star value, lowest first
    pub fn all() -> impl Iterator<Item = RatingValue> {
        (Self::MIN..=Self::MAX).map(RatingValue)
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pagination block of a listing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    /// Total number of pages for the query
    pub pages: u32,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Response of `GET /photos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoPage {
    pub photos: Vec<Photo>,
    pub pagination: Pagination,
}

/// Response of `GET /comments/photo/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentList {
    pub comments: Vec<Comment>,
}

/// Response of `GET /ratings/user/:id`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserRating {
    #[serde(default)]
    pub rating: Option<u8>,
}

impl UserRating {
    /// The stored rating, if the user has rated the photo
    pub fn value(&self) -> Option<RatingValue> {
        self.rating.and_then(RatingValue::new)
    }
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}
