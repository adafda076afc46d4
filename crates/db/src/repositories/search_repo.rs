//! Repository for publication search.
//!
//! [`SearchRepo::search`] dispatches a term to one of three matchers based on
//! [`SearchMode`]. All matching is a case-insensitive substring match under
//! full Unicode lower-casing; a blank term matches nothing.
//!
//! SQLite's `LOWER()` and `LIKE` only fold ASCII letters, so candidate rows are
//! read through the listing projection and matched with [`TermMatcher`].

use hive_core::search::{SearchMode, TermMatcher};

use crate::error::RepoResult;
use crate::models::publication::PublicationListing;
use crate::repositories::publication_repo::{listing_select, VendorJoin};
use crate::DbPool;

/// Provides search operations over publications.
pub struct SearchRepo;

impl SearchRepo {
    /// Route `term` to the matcher selected by `mode`.
    pub async fn search(
        pool: &DbPool,
        term: &str,
        mode: SearchMode,
    ) -> RepoResult<Vec<PublicationListing>> {
        tracing::debug!(mode = mode.as_str(), term, "Publication search");
        match mode {
            SearchMode::Publications => Self::search_publications(pool, term).await,
            SearchMode::Vendors => Self::search_by_vendor_name(pool, term).await,
            SearchMode::Categories => Self::search_categories(pool, term).await,
        }
    }

    /// Match against publication `name` or `description`.
    ///
    /// Publications whose vendor was deleted still match.
    pub async fn search_publications(
        pool: &DbPool,
        term: &str,
    ) -> RepoResult<Vec<PublicationListing>> {
        let Some(matcher) = TermMatcher::new(term) else {
            return Ok(Vec::new());
        };
        Self::filtered(pool, VendorJoin::Left, |row| {
            matcher.matches(&row.publication.name)
                || matcher.matches(&row.publication.description)
        })
        .await
    }

    /// Match against publication `category`. Uncategorised publications
    /// never match.
    pub async fn search_categories(
        pool: &DbPool,
        term: &str,
    ) -> RepoResult<Vec<PublicationListing>> {
        let Some(matcher) = TermMatcher::new(term) else {
            return Ok(Vec::new());
        };
        Self::filtered(pool, VendorJoin::Left, |row| {
            matcher.matches_opt(row.publication.category.as_deref())
        })
        .await
    }

    /// Match against the owning vendor's `name`.
    ///
    /// Uses an inner join: publications without a resolvable vendor never match.
    pub async fn search_by_vendor_name(
        pool: &DbPool,
        term: &str,
    ) -> RepoResult<Vec<PublicationListing>> {
        let Some(matcher) = TermMatcher::new(term) else {
            return Ok(Vec::new());
        };
        Self::filtered(pool, VendorJoin::Inner, |row| {
            matcher.matches_opt(row.vendor_name.as_deref())
        })
        .await
    }

    /// Read listings in publication id order and keep those accepted by `keep`.
    async fn filtered<F>(
        pool: &DbPool,
        join: VendorJoin,
        keep: F,
    ) -> RepoResult<Vec<PublicationListing>>
    where
        F: Fn(&PublicationListing) -> bool,
    {
        let query = format!("{} ORDER BY p.id", listing_select(join));
        let mut rows = sqlx::query_as::<_, PublicationListing>(&query)
            .fetch_all(pool)
            .await?;
        rows.retain(|row| keep(row));
        Ok(rows)
    }
}
