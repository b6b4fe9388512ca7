use crate::detail::build_details;
use crate::error::Result;
use crate::layout::SiteLayout;
use crate::overview::build_overview;
use crate::pages::{build_pages, PageReport};

/// Overview, detail files, then pages. Pages already newer than their
/// inputs are left untouched.
pub fn build_all(layout: &SiteLayout) -> Result<PageReport> {
    build_overview(layout)?;
    build_details(layout)?;
    build_pages(layout, false)
}
