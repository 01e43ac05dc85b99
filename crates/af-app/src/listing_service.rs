//! Project listing service.

use af_records::{DesignRecord, RecordSet, parse_listing_page};

use crate::error::AppResult;
use crate::source::ListingSource;

/// Designs read from a paged listing.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub designs: Vec<DesignRecord>,
    /// A non-empty page exists past the page cap and was not read.
    pub truncated: bool,
}

/// Read listing pages from 1 until an absent or empty page, or `page_cap`.
///
/// When the cap is reached the next page is fetched once to tell a listing
/// that ends exactly at the cap from one that was cut short.
pub fn collect_listing(source: &dyn ListingSource, page_cap: usize) -> AppResult<Listing> {
    let mut listing = Listing::default();
    for page in 1..=page_cap {
        let Some(value) = source.fetch_page(page)? else {
            return Ok(listing);
        };
        let entries = parse_listing_page(&value)?;
        if entries.is_empty() {
            return Ok(listing);
        }
        tracing::debug!(page, entries = entries.len(), "read listing page");
        listing.designs.extend(entries);
    }

    listing.truncated = has_entries(source, page_cap.saturating_add(1));
    if listing.truncated {
        tracing::warn!(page_cap, "listing page cap reached; remaining pages ignored");
    }
    Ok(listing)
}

fn has_entries(source: &dyn ListingSource, page: usize) -> bool {
    match source.fetch_page(page) {
        Ok(Some(value)) => parse_listing_page(&value).is_ok_and(|entries| !entries.is_empty()),
        Ok(None) => false,
        Err(err) => {
            tracing::debug!(page, %err, "could not check for a page past the cap");
            false
        }
    }
}

/// Collect the whole listing and deduplicate it.
pub fn load_records(source: &dyn ListingSource, page_cap: usize) -> AppResult<RecordSet> {
    let listing = collect_listing(source, page_cap)?;
    let records = RecordSet::from_designs(listing.designs);
    tracing::info!(
        designs = records.designs.len(),
        projects = records.projects.len(),
        basic = records.counts.basic,
        advanced = records.counts.advanced,
        truncated = listing.truncated,
        "loaded project listing"
    );
    Ok(records)
}
