use std::collections::HashSet;

use crate::license::expression::LicenseExpression;
use crate::license::parser::parse;
use crate::models::ContentStatus;

/// The approved-license set a deployment accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedLicenses {
    ids: HashSet<String>,
}

impl ApprovedLicenses {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ApprovedLicenses {
            ids: ids
                .into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Status of a raw license expression. Blank or malformed expressions are
    /// restricted.
    pub fn status_of(&self, expression: &str) -> ContentStatus {
        if expression.trim().is_empty() {
            return ContentStatus::Restricted;
        }
        self.status_of_expression(&parse(expression))
    }

    pub fn status_of_expression(&self, expression: &LicenseExpression) -> ContentStatus {
        if expression.matches_approved(&self.ids) {
            ContentStatus::Approved
        } else {
            ContentStatus::Restricted
        }
    }
}

impl Default for ApprovedLicenses {
    /// Built-in approved set used when no policy file is found: common
    /// permissive and weak-copyleft licenses.
    fn default() -> Self {
        ApprovedLicenses::new([
            "0BSD",
            "Apache-1.1",
            "Apache-2.0",
            "Artistic-2.0",
            "BSD-2-Clause",
            "BSD-3-Clause",
            "BlueOak-1.0.0",
            "BSL-1.0",
            "CC-BY-3.0",
            "CC-BY-4.0",
            "CC0-1.0",
            "CDDL-1.0",
            "CDDL-1.1",
            "EPL-1.0",
            "EPL-2.0",
            "EDL-1.0",
            "ISC",
            "LGPL-2.1-only",
            "LGPL-2.1-or-later",
            "LGPL-3.0-only",
            "LGPL-3.0-or-later",
            "MIT",
            "MIT-0",
            "MPL-2.0",
            "PSF-2.0",
            "Python-2.0",
            "Unicode-DFS-2016",
            "Unlicense",
            "W3C",
            "Zlib",
        ])
    }
}
