/// Listing query state shared by the gallery pages
///
/// Holds page, sort key and search term and turns them into the query
/// parameters of `GET /photos`. The server does the actual paging, sorting
/// and filtering.
use serde::Serialize;
use std::fmt;

/// Fixed number of photos per listing page
pub const PAGE_SIZE: u32 = 12;

/// Server-side sort key for the listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "uploadDate")]
    UploadDate,
    #[serde(rename = "averageRating")]
    AverageRating,
    #[serde(rename = "views")]
    Views,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::UploadDate, SortKey::AverageRating, SortKey::Views];
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::UploadDate => "Newest First",
            SortKey::AverageRating => "Highest Rated",
            SortKey::Views => "Most Viewed",
        };
        write!(f, "{}", label)
    }
}

/// Sort direction. The listing always asks for descending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Desc,
}

/// Query string of `GET /photos`, in the order the parameters are sent
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub page: u32,
    pub limit: u32,
    pub sort_by: SortKey,
    pub order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Local pagination, sort and search state of a listing page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    page: u32,
    total_pages: u32,
    sort_by: SortKey,
    search: String,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            sort_by: SortKey::default(),
            search: String::new(),
        }
    }
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn sort_by(&self) -> SortKey {
        self.sort_by
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Highest page that navigation may reach (never below 1)
    fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }

    /// Jump to `page`, clamped into `[1, total_pages]`.
    /// Returns true if the page actually changed.
    pub fn go_to(&mut self, page: u32) -> bool {
        let clamped = page.clamp(1, self.last_page());
        let changed = clamped != self.page;
        self.page = clamped;
        changed
    }

    /// Step back one page; a no-op on the first page
    pub fn previous(&mut self) -> bool {
        self.go_to(self.page.saturating_sub(1))
    }

    /// Step forward one page; a no-op on the last page
    pub fn next(&mut self) -> bool {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    /// Pagination controls only appear when there is more than one page
    pub fn shows_pagination(&self) -> bool {
        self.total_pages > 1
    }

    /// Record the page count reported by the server.
    /// The current page is pulled back inside the new range.
    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages;
        self.page = self.page.clamp(1, self.last_page());
    }

    pub fn set_sort_by(&mut self, sort_by: SortKey) -> bool {
        let changed = self.sort_by != sort_by;
        self.sort_by = sort_by;
        changed
    }

    /// Update the free-text search term without touching the page
    pub fn set_search(&mut self, search: impl Into<String>) -> bool {
        let search = search.into();
        let changed = self.search != search;
        self.search = search;
        changed
    }

    /// A submitted search always restarts from the first page
    pub fn submit_search(&mut self) {
        self.page = 1;
    }

    /// Query parameters for the current state
    pub fn params(&self) -> ListingParams {
        ListingParams {
            page: self.page,
            limit: PAGE_SIZE,
            sort_by: self.sort_by,
            order: SortOrder::Desc,
            search: (!self.search.is_empty()).then(|| self.search.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_with_pages(total: u32) -> ListingQuery {
        let mut query = ListingQuery::new();
        query.set_total_pages(total);
        query
    }

    #[test]
    fn test_defaults() {
        let query = ListingQuery::new();
        assert_eq!(query.page(), 1);
        assert_eq!(query.sort_by(), SortKey::UploadDate);
        assert!(!query.shows_pagination());
        assert!(!query.has_previous());
        assert!(!query.has_next());
    }

    #[test]
    fn test_go_to_clamps_to_bounds() {
        let mut query = query_with_pages(5);

        query.go_to(0);
        assert_eq!(query.page(), 1);

        query.go_to(42);
        assert_eq!(query.page(), 5);

        query.go_to(3);
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn test_controls_disabled_exactly_at_boundaries() {
        let mut query = query_with_pages(3);

        assert!(!query.has_previous());
        assert!(query.has_next());

        query.next();
        assert!(query.has_previous());
        assert!(query.has_next());

        query.next();
        assert!(query.has_previous());
        assert!(!query.has_next());

        // Stepping past the end stays put
        assert!(!query.next());
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn test_previous_on_first_page_is_noop() {
        let mut query = query_with_pages(3);
        assert!(!query.previous());
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_shrinking_total_pulls_page_back() {
        let mut query = query_with_pages(10);
        query.go_to(8);
        query.set_total_pages(4);
        assert_eq!(query.page(), 4);

        query.set_total_pages(0);
        assert_eq!(query.page(), 1);
        assert!(!query.has_next());
    }

    #[test]
    fn test_submit_search_resets_page() {
        let mut query = query_with_pages(6);
        query.go_to(4);
        query.set_search("sunset");
        assert_eq!(query.page(), 4);

        query.submit_search();
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_params_omit_empty_search() {
        let query = ListingQuery::new();
        let params = query.params();
        assert_eq!(params.limit, PAGE_SIZE);
        assert_eq!(params.order, SortOrder::Desc);
        assert_eq!(params.search, None);
    }

    #[test]
    fn test_params_carry_search_and_sort() {
        let mut query = ListingQuery::new();
        query.set_sort_by(SortKey::AverageRating);
        query.set_search("sunset");

        let params = query.params();
        assert_eq!(params.page, 1);
        assert_eq!(params.sort_by, SortKey::AverageRating);
        assert_eq!(params.search.as_deref(), Some("sunset"));
    }
}
