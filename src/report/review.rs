use colored::Colorize;

use crate::models::{ContentId, LicenseMap, Status};

/// Ids whose license could not be automatically verified, in id order.
pub fn needs_review(results: &LicenseMap) -> Vec<&ContentId> {
    results
        .values()
        .filter(|d| d.status() != Status::Approved)
        .map(|d| d.id())
        .collect()
}

/// Print the needs-review summary to stderr.
pub fn render(pending: &[&ContentId]) {
    if pending.is_empty() {
        eprintln!(
            "{} Vetted license information was found for all content. No further investigation is required.",
            "✓".green()
        );
        return;
    }

    eprintln!(
        "{} License information could not be automatically verified for the following content:\n",
        "✗".red()
    );
    for id in pending {
        eprintln!("    {}", id);
    }
    eprintln!("\nThis content is either not correctly mapped by the system, or requires review.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentData, ContentStatus, LicenseData};

    #[test]
    fn test_needs_review_excludes_approved() {
        let ok = ContentId::new("npm", "npmjs", None, "ok", "1.0.0");
        let bad = ContentId::new("npm", "npmjs", None, "bad", "1.0.0");
        let unknown = ContentId::new("npm", "npmjs", None, "unknown", "1.0.0");

        let mut results = LicenseMap::new();
        for (id, status) in [
            (&ok, Some(ContentStatus::Approved)),
            (&bad, Some(ContentStatus::Restricted)),
            (&unknown, None),
        ] {
            let mut data = LicenseData::new(id.clone());
            if let Some(status) = status {
                data.add_content_data(ContentData::new(id.clone(), "X", 1, status, "t"));
            }
            results.insert(id.clone(), data);
        }

        assert_eq!(needs_review(&results), vec![&bad, &unknown]);
    }
}
