use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::error::{parse_error_message, ApiError};
use crate::state::data::{
    AuthSession, Comment, CommentList, Photo, PhotoPage, RatingValue, Role, UserRating,
};
use crate::state::listing::ListingParams;
use crate::state::upload::UploadRequest;

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewComment<'a> {
    photo_id: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewRating<'a> {
    photo_id: &'a str,
    rating: RatingValue,
}

/// Thin wrapper around `reqwest::Client` for the photo API.
///
/// Resolves endpoints against the configured base URL and attaches the
/// session token as a bearer credential. Cloning is cheap; clones share the
/// connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    user_agent: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        // Endpoint paths are appended as segments, so normalise away a trailing slash
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty();
        }

        Ok(ApiClient {
            client: Client::new(),
            base_url,
            user_agent: format!("photo-share/{}", env!("CARGO_PKG_VERSION")),
            token: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[cfg(test)]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Replace the session token sent with every request
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// `base_url` with `segments` appended (each one percent-encoded)
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request_builder(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::USER_AGENT, &self.user_agent);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, request: Request) -> Result<Response, ApiError> {
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.client.execute(request).await?;
        let status = response.status();
        if status.is_success() {
            log::debug!("{} {} -> {}", method, url, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::warn!("{} {} failed with status code {}", method, url, status);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message: parse_error_message(&body),
        })
    }

    async fn execute_json<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        let response = self.execute(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn execute_empty(&self, request: Request) -> Result<(), ApiError> {
        self.execute(request).await?;
        Ok(())
    }

    // ========== Photos ==========

    pub fn list_photos_request(&self, params: &ListingParams) -> Result<Request, ApiError> {
        let url = self.endpoint(&["photos"])?;
        Ok(self.request_builder(Method::GET, url).query(params).build()?)
    }

    /// `GET /photos` with paging, sorting and search parameters
    pub async fn list_photos(&self, params: &ListingParams) -> Result<PhotoPage, ApiError> {
        self.execute_json(self.list_photos_request(params)?).await
    }

    pub fn get_photo_request(&self, photo_id: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&["photos", photo_id])?;
        Ok(self.request_builder(Method::GET, url).build()?)
    }

    pub async fn get_photo(&self, photo_id: &str) -> Result<Photo, ApiError> {
        self.execute_json(self.get_photo_request(photo_id)?).await
    }

    pub fn upload_photo_request(&self, upload: &UploadRequest) -> Result<Request, ApiError> {
        let people = serde_json::to_string(&upload.people)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let image = Part::bytes(upload.image.bytes.clone())
            .file_name(upload.image.file_name.clone())
            .mime_str(upload.image.mime)?;

        let form = Form::new()
            .part("image", image)
            .text("title", upload.title.clone())
            .text("caption", upload.caption.clone())
            .text("location", upload.location.clone())
            .text("people", people);

        let url = self.endpoint(&["photos", "upload"])?;
        Ok(self.request_builder(Method::POST, url).multipart(form).build()?)
    }

    /// `POST /photos/upload` as multipart; the people list travels as one
    /// JSON-encoded field
    pub async fn upload_photo(&self, upload: &UploadRequest) -> Result<Photo, ApiError> {
        self.execute_json(self.upload_photo_request(upload)?).await
    }

    // ========== Comments ==========

    pub fn list_comments_request(&self, photo_id: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&["comments", "photo", photo_id])?;
        Ok(self.request_builder(Method::GET, url).build()?)
    }

    pub async fn list_comments(&self, photo_id: &str) -> Result<Vec<Comment>, ApiError> {
        let list: CommentList = self.execute_json(self.list_comments_request(photo_id)?).await?;
        Ok(list.comments)
    }

    pub fn post_comment_request(&self, photo_id: &str, text: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&["comments"])?;
        Ok(self
            .request_builder(Method::POST, url)
            .json(&NewComment { photo_id, text })
            .build()?)
    }

    pub async fn post_comment(&self, photo_id: &str, text: &str) -> Result<Comment, ApiError> {
        self.execute_json(self.post_comment_request(photo_id, text)?).await
    }

    pub fn delete_comment_request(&self, comment_id: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&["comments", comment_id])?;
        Ok(self.request_builder(Method::DELETE, url).build()?)
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError> {
        self.execute_empty(self.delete_comment_request(comment_id)?).await
    }

    // ========== Ratings ==========

    pub fn get_user_rating_request(&self, photo_id: &str) -> Result<Request, ApiError> {
        let url = self.endpoint(&["ratings", "user", photo_id])?;
        Ok(self.request_builder(Method::GET, url).build()?)
    }

    /// The signed-in user's rating of `photo_id`, if they have rated it
    pub async fn get_user_rating(&self, photo_id: &str) -> Result<Option<RatingValue>, ApiError> {
        let rating: UserRating = self.execute_json(self.get_user_rating_request(photo_id)?).await?;
        Ok(rating.value())
    }

    pub fn submit_rating_request(
        &self,
        photo_id: &str,
        rating: RatingValue,
    ) -> Result<Request, ApiError> {
        let url = self.endpoint(&["ratings"])?;
        Ok(self
            .request_builder(Method::POST, url)
            .json(&NewRating { photo_id, rating })
            .build()?)
    }

    /// Create or overwrite the signed-in user's rating of `photo_id`
    pub async fn submit_rating(&self, photo_id: &str, rating: RatingValue) -> Result<(), ApiError> {
        self.execute_empty(self.submit_rating_request(photo_id, rating)?).await
    }

    // ========== Auth ==========

    pub fn login_request(&self, login: &LoginRequest) -> Result<Request, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        Ok(self.request_builder(Method::POST, url).json(login).build()?)
    }

    pub async fn login(&self, login: &LoginRequest) -> Result<AuthSession, ApiError> {
        self.execute_json(self.login_request(login)?).await
    }

    pub fn register_request(&self, register: &RegisterRequest) -> Result<Request, ApiError> {
        let url = self.endpoint(&["auth", "register"])?;
        Ok(self.request_builder(Method::POST, url).json(register).build()?)
    }

    pub async fn register(&self, register: &RegisterRequest) -> Result<AuthSession, ApiError> {
        self.execute_json(self.register_request(register)?).await
    }

    // ========== Images ==========

    /// Resolve a photo's `imageUrl`: absolute URLs are kept, anything else
    /// is taken relative to the API origin
    pub fn resolve_image_url(&self, image_url: &str) -> Result<Url, ApiError> {
        match Url::parse(image_url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(self.base_url.join(image_url)?),
            Err(e) => Err(e.into()),
        }
    }

    pub fn fetch_image_request(&self, image_url: &str) -> Result<Request, ApiError> {
        let url = self.resolve_image_url(image_url)?;
        // The token only goes to the API's own origin, never to a CDN
        let builder = if url.origin() == self.base_url.origin() {
            self.request_builder(Method::GET, url)
        } else {
            self.client
                .get(url)
                .header(reqwest::header::USER_AGENT, &self.user_agent)
        };
        Ok(builder.build()?)
    }

    /// Download the raw bytes of a photo
    pub async fn fetch_image(&self, image_url: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.execute(self.fetch_image_request(image_url)?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SelectedImage;
    use crate::state::listing::{ListingQuery, SortKey};
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:5000/api").unwrap()
    }

    fn body_json(request: &Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_listing_query_string() {
        let mut query = ListingQuery::new();
        query.set_sort_by(SortKey::AverageRating);
        query.set_search("sunset");
        query.submit_search();

        let request = client().list_photos_request(&query.params()).unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:5000/api/photos?page=1&limit=12&sortBy=averageRating&order=desc&search=sunset"
        );
    }

    #[test]
    fn test_listing_without_search_omits_parameter() {
        let request = client()
            .list_photos_request(&ListingQuery::new().params())
            .unwrap();
        assert_eq!(
            request.url().query(),
            Some("page=1&limit=12&sortBy=uploadDate&order=desc")
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let client = ApiClient::new("http://localhost:5000/api/").unwrap();
        let request = client.get_photo_request("abc123").unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:5000/api/photos/abc123");
    }

    #[test]
    fn test_ids_are_path_encoded() {
        let request = client().delete_comment_request("a/b").unwrap();
        assert_eq!(request.url().path(), "/api/comments/a%2Fb");
    }

    #[test]
    fn test_token_attached_when_present() {
        let anonymous = client().get_photo_request("p1").unwrap();
        assert!(anonymous.headers().get(AUTHORIZATION).is_none());

        let mut client = client();
        client.set_token(Some("secret".to_string()));
        let request = client.get_photo_request("p1").unwrap();
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer secret");
    }

    #[test]
    fn test_comment_and_rating_bodies() {
        let client = client();

        let comment = client.post_comment_request("p1", "Lovely light").unwrap();
        assert_eq!(comment.url().path(), "/api/comments");
        assert_eq!(
            body_json(&comment),
            serde_json::json!({ "photoId": "p1", "text": "Lovely light" })
        );

        let rating = client
            .submit_rating_request("p1", RatingValue::new(4).unwrap())
            .unwrap();
        assert_eq!(rating.url().path(), "/api/ratings");
        assert_eq!(body_json(&rating), serde_json::json!({ "photoId": "p1", "rating": 4 }));
    }

    #[test]
    fn test_rating_and_comment_list_paths() {
        let client = client();
        assert_eq!(
            client.get_user_rating_request("p9").unwrap().url().path(),
            "/api/ratings/user/p9"
        );
        assert_eq!(
            client.list_comments_request("p9").unwrap().url().path(),
            "/api/comments/photo/p9"
        );
    }

    #[test]
    fn test_register_body_uses_lowercase_role() {
        let request = client()
            .register_request(&RegisterRequest {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                password: "hunter22".to_string(),
                role: Role::Creator,
            })
            .unwrap();
        assert_eq!(request.url().path(), "/api/auth/register");
        assert_eq!(body_json(&request)["role"], "creator");
    }

    #[test]
    fn test_upload_is_multipart() {
        let upload = UploadRequest {
            title: "Harbour".to_string(),
            caption: String::new(),
            location: String::new(),
            people: vec!["Ana".to_string()],
            image: SelectedImage {
                file_name: "harbour.jpg".to_string(),
                mime: "image/jpeg",
                bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
                preview: None,
            },
        };

        let request = client().upload_photo_request(&upload).unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().path(), "/api/photos/upload");
        let content_type = request.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data"));
    }

    #[test]
    fn test_image_urls() {
        let mut client = client();
        client.set_token(Some("secret".to_string()));

        let relative = client.fetch_image_request("/uploads/p1.jpg").unwrap();
        assert_eq!(relative.url().as_str(), "http://localhost:5000/uploads/p1.jpg");
        assert!(relative.headers().get(AUTHORIZATION).is_some());

        let cdn = client
            .fetch_image_request("https://cdn.example.com/p1.jpg")
            .unwrap();
        assert_eq!(cdn.url().host_str(), Some("cdn.example.com"));
        assert!(cdn.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(ApiClient::new("not a url").is_err());
        assert!(ApiClient::new("mailto:someone@example.com").is_err());
    }
}
