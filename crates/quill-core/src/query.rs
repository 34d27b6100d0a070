//! Blog queries: pagination, date ranges and owner-scoped filters.
//!
//! A [`BlogQuery`] is the typed form of the filter handed to a
//! [`BlogRepository`](crate::ports::BlogRepository): equality on user and
//! category (always present), plus optional id, keyword and creation-date
//! constraints, all combined with AND. Results are ordered by ascending
//! creation time and paginated with skip/limit.
//!
//! ```
//! use quill_core::domain::ObjectId;
//! use quill_core::query::{BlogQuery, Pagination};
//!
//! let query = BlogQuery::builder(ObjectId::new(), ObjectId::new())
//!     .keywords("rust")
//!     .pagination(Pagination::new(2, 5))
//!     .build();
//!
//! assert_eq!(query.pagination().skip(), 5);
//! ```

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::Blog;
use crate::error::DomainError;
use crate::validation::BlogOwner;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Upper bound applied to `limit` unless configured otherwise.
pub const DEFAULT_MAX_LIMIT: u64 = 100;
/// Largest offset a store accepts; both backends bind skip as a signed 64-bit integer.
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    /// Zero values are raised to 1.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Coerce raw `page`/`limit` parameters.
    ///
    /// Absent, non-numeric or non-positive values fall back to the defaults,
    /// and `limit` is clamped to `max_limit`.
    pub fn parse(page: Option<&str>, limit: Option<&str>, max_limit: u64) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(limit)
            .unwrap_or(DEFAULT_LIMIT)
            .min(max_limit.max(1));
        Self::new(page, limit)
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Records before this page, capped at [`MAX_SKIP`]. A page past the end
    /// of the data yields an empty result rather than an overflow.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_SKIP)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<u64>().ok().filter(|n| *n >= 1)
}

/// Inclusive range over `createdAt`. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| *at >= start) && self.end.is_none_or(|end| *at <= end)
    }
}

/// Parse an optional date parameter.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00+02:00`), a naive date-time read as
/// UTC (`2024-05-01T10:00:00`) or a plain date read as midnight UTC
/// (`2024-05-01`). Empty input counts as absent.
pub fn parse_date_param(raw: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, DomainError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    if let Ok(at) = raw.parse::<NaiveDateTime>() {
        return Ok(Some(at.and_utc()));
    }
    if let Some(at) = raw
        .parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(at.and_utc()));
    }

    Err(DomainError::invalid_input(format!("Invalid {field}")))
}

/// Optional listing parameters in their raw wire form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListFilters<'a> {
    pub keywords: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
    pub page: Option<&'a str>,
    pub limit: Option<&'a str>,
}

/// Filters for a blog lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogQuery {
    user: ObjectId,
    category: ObjectId,
    id: Option<ObjectId>,
    keywords: Option<String>,
    created: DateRange,
    pagination: Pagination,
}

impl BlogQuery {
    pub fn builder(user: ObjectId, category: ObjectId) -> BlogQueryBuilder {
        BlogQueryBuilder {
            query: BlogQuery {
                user,
                category,
                id: None,
                keywords: None,
                created: DateRange::default(),
                pagination: Pagination::default(),
            },
        }
    }

    pub fn for_owner(owner: BlogOwner) -> BlogQueryBuilder {
        Self::builder(owner.user, owner.category)
    }

    pub fn user(&self) -> ObjectId {
        self.user
    }

    pub fn category(&self) -> ObjectId {
        self.category
    }

    pub fn id(&self) -> Option<ObjectId> {
        self.id
    }

    /// Trimmed, non-empty keyword text.
    pub fn keywords(&self) -> Option<&str> {
        self.keywords.as_deref()
    }

    pub fn created(&self) -> &DateRange {
        &self.created
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Whether `blog` satisfies every constraint. Pagination is not considered.
    pub fn matches(&self, blog: &Blog) -> bool {
        blog.user == self.user
            && blog.category == self.category
            && self.id.is_none_or(|id| blog.id == id)
            && self.keywords.as_deref().is_none_or(|kw| {
                let needle = kw.to_lowercase();
                blog.title.to_lowercase().contains(&needle)
                    || blog.description.to_lowercase().contains(&needle)
            })
            && self.created.contains(&blog.created_at)
    }
}

/// Accumulates optional constraints onto the required user/category pair.
#[derive(Debug, Clone)]
pub struct BlogQueryBuilder {
    query: BlogQuery,
}

impl BlogQueryBuilder {
    pub fn id(mut self, id: ObjectId) -> Self {
        self.query.id = Some(id);
        self
    }

    /// Blank keywords leave the query unconstrained.
    pub fn keywords(mut self, keywords: impl AsRef<str>) -> Self {
        let keywords = keywords.as_ref().trim();
        self.query.keywords = (!keywords.is_empty()).then(|| keywords.to_owned());
        self
    }

    pub fn created_from(mut self, start: DateTime<Utc>) -> Self {
        self.query.created.start = Some(start);
        self
    }

    pub fn created_until(mut self, end: DateTime<Utc>) -> Self {
        self.query.created.end = Some(end);
        self
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.query.pagination = pagination;
        self
    }

    /// Apply raw listing parameters. Unparseable dates are rejected.
    pub fn filters(mut self, filters: &ListFilters<'_>, max_limit: u64) -> Result<Self, DomainError> {
        if let Some(keywords) = filters.keywords {
            self = self.keywords(keywords);
        }
        if let Some(start) = parse_date_param(filters.start_date, "startDate")? {
            self = self.created_from(start);
        }
        if let Some(end) = parse_date_param(filters.end_date, "endDate")? {
            self = self.created_until(end);
        }
        Ok(self.pagination(Pagination::parse(filters.page, filters.limit, max_limit)))
    }

    pub fn build(self) -> BlogQuery {
        self.query
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn blog(user: ObjectId, category: ObjectId, title: &str, description: &str) -> Blog {
        Blog {
            id: ObjectId::new(),
            title: title.to_owned(),
            description: description.to_owned(),
            user,
            category,
            created_at: Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn pagination_computes_skip() {
        let pagination = Pagination::parse(Some("2"), Some("5"), DEFAULT_MAX_LIMIT);
        assert_eq!(pagination.skip(), 5);
        assert_eq!(pagination.limit(), 5);
    }

    #[test]
    fn pagination_defaults_on_absent_or_garbage() {
        assert_eq!(Pagination::parse(None, None, DEFAULT_MAX_LIMIT), Pagination::new(1, 10));
        assert_eq!(
            Pagination::parse(Some("abc"), Some("-3"), DEFAULT_MAX_LIMIT),
            Pagination::new(1, 10)
        );
        assert_eq!(
            Pagination::parse(Some("0"), Some("0"), DEFAULT_MAX_LIMIT),
            Pagination::new(1, 10)
        );
        assert_eq!(Pagination::default().skip(), 0);
    }

    #[test]
    fn pagination_clamps_limit() {
        let pagination = Pagination::parse(Some("3"), Some("100000"), 50);
        assert_eq!(pagination.limit(), 50);
        assert_eq!(pagination.skip(), 100);
    }

    #[test]
    fn pagination_skip_fits_a_signed_offset() {
        let pagination = Pagination::parse(Some("18446744073709551615"), Some("10"), DEFAULT_MAX_LIMIT);
        assert_eq!(pagination.page(), u64::MAX);
        assert_eq!(pagination.skip(), MAX_SKIP);
        assert!(i64::try_from(pagination.skip()).is_ok());

        let pagination = Pagination::new(i64::MAX as u64, 100);
        assert_eq!(pagination.skip(), MAX_SKIP);
    }

    #[test]
    fn parses_supported_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date_param(Some("2024-05-01"), "startDate").unwrap(), Some(midnight));
        assert_eq!(
            parse_date_param(Some("2024-05-01T00:00:00Z"), "startDate").unwrap(),
            Some(midnight)
        );
        assert_eq!(
            parse_date_param(Some("2024-05-01T02:00:00+02:00"), "startDate").unwrap(),
            Some(midnight)
        );
        assert_eq!(
            parse_date_param(Some("2024-05-01T00:00:00"), "startDate").unwrap(),
            Some(midnight)
        );
        assert_eq!(parse_date_param(Some("  "), "startDate").unwrap(), None);
        assert_eq!(parse_date_param(None, "startDate").unwrap(), None);
    }

    #[test]
    fn rejects_unparseable_dates() {
        let err = parse_date_param(Some("yesterday"), "endDate").unwrap_err();
        assert_eq!(err, DomainError::InvalidInput("Invalid endDate".into()));
    }

    #[test]
    fn keywords_match_title_or_description_case_insensitively() {
        let (user, category) = (ObjectId::new(), ObjectId::new());
        let query = BlogQuery::builder(user, category).keywords("foo").build();

        assert!(query.matches(&blog(user, category, "FooBar", "nothing")));
        assert!(query.matches(&blog(user, category, "title", "has foo in it")));
        assert!(!query.matches(&blog(user, category, "title", "description")));
    }

    #[test]
    fn blank_keywords_are_ignored() {
        let query = BlogQuery::builder(ObjectId::new(), ObjectId::new())
            .keywords("   ")
            .build();
        assert_eq!(query.keywords(), None);
    }

    #[test]
    fn owner_constraints_are_always_applied() {
        let (user, category) = (ObjectId::new(), ObjectId::new());
        let query = BlogQuery::builder(user, category).build();

        assert!(query.matches(&blog(user, category, "t", "d")));
        assert!(!query.matches(&blog(ObjectId::new(), category, "t", "d")));
        assert!(!query.matches(&blog(user, ObjectId::new(), "t", "d")));
    }

    #[test]
    fn date_range_is_inclusive() {
        let (user, category) = (ObjectId::new(), ObjectId::new());
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let inside = blog(user, category, "t", "d");

        let exact = BlogQuery::builder(user, category)
            .created_from(at)
            .created_until(at)
            .build();
        assert!(exact.matches(&inside));

        let before = BlogQuery::builder(user, category)
            .created_until(at - chrono::Duration::seconds(1))
            .build();
        assert!(!before.matches(&inside));

        let after = BlogQuery::builder(user, category)
            .created_from(at + chrono::Duration::seconds(1))
            .build();
        assert!(!after.matches(&inside));
    }

    #[test]
    fn filters_apply_raw_parameters() {
        let query = BlogQuery::builder(ObjectId::new(), ObjectId::new())
            .filters(
                &ListFilters {
                    keywords: Some(" rust "),
                    start_date: Some("2024-01-01"),
                    end_date: None,
                    page: Some("4"),
                    limit: Some("20"),
                },
                DEFAULT_MAX_LIMIT,
            )
            .unwrap()
            .build();

        assert_eq!(query.keywords(), Some("rust"));
        assert_eq!(
            query.created().start,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(query.created().end, None);
        assert_eq!(query.pagination().skip(), 60);
    }

    #[test]
    fn filters_reject_bad_start_date() {
        let err = BlogQuery::builder(ObjectId::new(), ObjectId::new())
            .filters(
                &ListFilters {
                    start_date: Some("01/13/2024"),
                    ..Default::default()
                },
                DEFAULT_MAX_LIMIT,
            )
            .unwrap_err();
        assert_eq!(err, DomainError::InvalidInput("Invalid startDate".into()));
    }
}
