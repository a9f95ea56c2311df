use std::sync::OnceLock;

use regex::Regex;

use crate::ids::ContentIdParser;
use crate::models::ContentId;

/// Five-part ClearlyDefined coordinates: `type/provider/namespace/name/revision`,
/// with `-` standing in for an absent namespace.
pub struct ClearlyDefinedIdParser;

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^(?P<type>[\w\-]+)/(?P<provider>[\w\-.]+)/(?P<namespace>(?:[\w@\-.]|%2[Ff])+)/(?P<name>(?:[\w@\-.+]|%2[Ff])+)/(?P<revision>[^/\s]+)$",
            )
            .ok()
        })
        .as_ref()
}

impl ContentIdParser for ClearlyDefinedIdParser {
    fn parse_id(&self, input: &str) -> Option<ContentId> {
        let caps = pattern()?.captures(input.trim())?;
        Some(ContentId::new(
            &caps["type"],
            &caps["provider"],
            Some(&caps["namespace"]),
            &caps["name"],
            &caps["revision"],
        ))
    }
}
