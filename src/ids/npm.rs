use std::sync::OnceLock;

use regex::Regex;

use crate::ids::ContentIdParser;
use crate::models::ContentId;

/// npm `[@scope/]name@version` notation.
pub struct NpmIdParser;

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^(?:(?P<scope>@[^\s/@]+)/)?(?P<name>[^\s/@]+)@(?P<version>[^\s@]+)$").ok()
        })
        .as_ref()
}

impl ContentIdParser for NpmIdParser {
    fn parse_id(&self, input: &str) -> Option<ContentId> {
        let caps = pattern()?.captures(input.trim())?;
        Some(ContentId::new(
            "npm",
            "npmjs",
            caps.name("scope").map(|m| m.as_str()),
            &caps["name"],
            &caps["version"],
        ))
    }
}
