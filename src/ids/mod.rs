//! Turning dependency list entries into [`ContentId`]s.
//!
//! Each parser recognises one notation and answers `None` for anything else;
//! [`parse_id`] tries them in order and falls back to an invalid id so that
//! unrecognised input still shows up in the results.

pub mod clearlydefined;
pub mod maven;
pub mod npm;
pub mod purl;
pub mod reader;

use crate::models::ContentId;

pub use reader::read_content_ids;

pub trait ContentIdParser {
    fn parse_id(&self, input: &str) -> Option<ContentId>;
}

/// Parse one dependency list entry.
pub fn parse_id(input: &str) -> ContentId {
    let parsers: [&dyn ContentIdParser; 4] = [
        &clearlydefined::ClearlyDefinedIdParser,
        &purl::PackageUrlIdParser,
        &maven::MavenIdParser,
        &npm::NpmIdParser,
    ];
    parsers
        .iter()
        .find_map(|parser| parser.parse_id(input))
        .unwrap_or_else(|| ContentId::invalid(input))
}

/// Parse the five-part canonical form used on the wire by the providers.
pub fn parse_canonical(input: &str) -> Option<ContentId> {
    clearlydefined::ClearlyDefinedIdParser.parse_id(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_order() {
        assert_eq!(
            parse_id("org.apache.commons:commons-lang3:3.12.0").as_str(),
            "maven/mavencentral/org.apache.commons/commons-lang3/3.12.0"
        );
        assert_eq!(
            parse_id("@babel/core@7.22.5").as_str(),
            "npm/npmjs/@babel/core/7.22.5"
        );
        assert_eq!(
            parse_id("pypi/pypi/-/requests/2.31.0").as_str(),
            "pypi/pypi/-/requests/2.31.0"
        );
        assert_eq!(
            parse_id("pkg:maven/org.apache.commons/commons-lang3@3.12.0").as_str(),
            "maven/mavencentral/org.apache.commons/commons-lang3/3.12.0"
        );
        assert_eq!(
            parse_id("pkg:npm/%40babel/core@7.22.5").as_str(),
            "npm/npmjs/@babel/core/7.22.5"
        );
    }

    #[test]
    fn test_canonical_form_is_not_mistaken_for_npm() {
        assert_eq!(
            parse_id("npm/npmjs/@babel/core/7.22.5").as_str(),
            "npm/npmjs/@babel/core/7.22.5"
        );
    }

    #[test]
    fn test_unrecognised_input_is_invalid() {
        let id = parse_id("just some text");
        assert!(!id.is_valid());
        assert_eq!(id.as_str(), "just some text");
    }
}
