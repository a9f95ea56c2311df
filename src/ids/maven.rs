use std::sync::OnceLock;

use regex::Regex;

use crate::ids::ContentIdParser;
use crate::models::ContentId;

/// Groups carrying this prefix are Eclipse p2 bundles re-exposed through Maven.
const P2_GROUP_PREFIX: &str = "p2.";

/// Maven GAV notation as printed by `mvn dependency:list`:
/// `groupId:artifactId[:type[:classifier]]:version[:scope]`.
pub struct MavenIdParser;

fn pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"^(?P<group>[^: ]+):(?P<artifact>[^: ]+)(?::(?P<ext>[^: ]*)(?::(?P<classifier>[^: ]+))?)?:(?P<version>v?\d[^: ]*)(?::(?P<scope>[^:]*))?$",
            )
            .ok()
        })
        .as_ref()
}

impl ContentIdParser for MavenIdParser {
    fn parse_id(&self, input: &str) -> Option<ContentId> {
        let caps = pattern()?.captures(input.trim())?;
        let group = &caps["group"];
        let (kind, source) = if group.starts_with(P2_GROUP_PREFIX) {
            ("p2", "orbit")
        } else {
            ("maven", "mavencentral")
        };
        Some(ContentId::new(
            kind,
            source,
            Some(group),
            &caps["artifact"],
            &caps["version"],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Option<String> {
        MavenIdParser.parse_id(input).map(|id| id.to_string())
    }

    #[test]
    fn test_plain_gav() {
        assert_eq!(
            parse("org.apache.commons:commons-lang3:3.12.0").as_deref(),
            Some("maven/mavencentral/org.apache.commons/commons-lang3/3.12.0")
        );
    }

    #[test]
    fn test_dependency_list_format() {
        assert_eq!(
            parse("  junit:junit:jar:4.13.2:test").as_deref(),
            Some("maven/mavencentral/junit/junit/4.13.2")
        );
        assert_eq!(
            parse("io.netty:netty-transport-native-epoll:jar:linux-x86_64:4.1.42.Final:compile").as_deref(),
            Some("maven/mavencentral/io.netty/netty-transport-native-epoll/4.1.42.Final")
        );
    }

    #[test]
    fn test_p2_group() {
        assert_eq!(
            parse("p2.eclipse-plugin:org.jaxen:jar:1.1.6:system").as_deref(),
            Some("p2/orbit/p2.eclipse-plugin/org.jaxen/1.1.6")
        );
    }

    #[test]
    fn test_rejects_non_gav() {
        assert_eq!(parse("left-pad@1.3.0"), None);
        assert_eq!(parse("group:artifact"), None);
        assert_eq!(parse("group:artifact:latest"), None);
    }
}
