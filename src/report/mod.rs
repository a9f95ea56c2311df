//! Report renderers for resolution results.
//!
//! - [`terminal`]: colored summary box and tables; respects `--verbose` / `--quiet`.
//! - [`csv`]: the flat `id, license, status, authority` summary file.
//! - [`review`]: the list of content that still needs a human decision.
//!
//! JSON output serializes [`rows`] directly.

pub mod csv;
pub mod review;
pub mod terminal;

use serde::Serialize;

use crate::models::{ContentId, LicenseMap, Status};

/// The read contract every renderer relies on.
#[derive(Debug, Serialize, PartialEq)]
pub struct ReportRow<'a> {
    pub id: &'a ContentId,
    pub license: Option<&'a str>,
    pub status: Status,
    pub authority: Option<&'a str>,
    pub url: Option<&'a str>,
}

pub fn rows(results: &LicenseMap) -> Vec<ReportRow<'_>> {
    results
        .values()
        .map(|data| ReportRow {
            id: data.id(),
            license: data.license(),
            status: data.status(),
            authority: data.authority(),
            url: data.url(),
        })
        .collect()
}
