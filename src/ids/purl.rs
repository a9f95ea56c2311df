use percent_encoding::percent_decode_str;

use crate::ids::ContentIdParser;
use crate::models::ContentId;

/// Package URLs: `pkg:type/namespace/name@version?qualifiers#subpath`.
///
/// The version is mandatory here even though purl allows it to be omitted.
/// Qualifiers and subpath are accepted and ignored. Namespaces with more than
/// one segment (Go module paths, for example) have no five-part form and are
/// rejected.
pub struct PackageUrlIdParser;

impl ContentIdParser for PackageUrlIdParser {
    fn parse_id(&self, input: &str) -> Option<ContentId> {
        let input = input.trim();
        let (scheme, rest) = input.split_once(':')?;
        if !scheme.eq_ignore_ascii_case("pkg") {
            return None;
        }

        let rest = rest.trim_start_matches('/');
        let rest = rest.split_once('#').map_or(rest, |(head, _subpath)| head);
        let rest = rest.split_once('?').map_or(rest, |(head, _qualifiers)| head);

        let (path, version) = rest.rsplit_once('@')?;
        let version = decode(version)?;

        let mut segments = path.trim_end_matches('/').split('/');
        let kind = segments.next()?.to_ascii_lowercase();
        let mut segments: Vec<String> = segments.map(decode).collect::<Option<_>>()?;
        let name = segments.pop()?;
        let namespace = match segments.len() {
            0 => None,
            1 => segments.pop(),
            _ => return None,
        };

        if kind.is_empty() || name.is_empty() || version.is_empty() {
            return None;
        }

        let (kind, source) = coordinates_for(&kind);
        Some(ContentId::new(
            kind,
            source,
            namespace.as_deref(),
            &name,
            &version,
        ))
    }
}

/// Map a purl type onto the `(type, source)` pair of the five-part form.
fn coordinates_for(kind: &str) -> (&str, &'static str) {
    match kind {
        "maven" => ("maven", "mavencentral"),
        "npm" => ("npm", "npmjs"),
        "github" => ("git", "github"),
        "pypi" => ("pypi", "pypi"),
        "nuget" => ("nuget", "nuget"),
        other => (other, "-"),
    }
}

fn decode(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Option<String> {
        PackageUrlIdParser
            .parse_id(input)
            .map(|id| id.as_str().to_string())
    }

    #[test]
    fn test_known_types() {
        assert_eq!(
            parse("pkg:npm/foobar@12.3.1").as_deref(),
            Some("npm/npmjs/-/foobar/12.3.1")
        );
        assert_eq!(
            parse("pkg:maven/org.apache.xmlgraphics/batik-anim@1.9.1?packaging=sources").as_deref(),
            Some("maven/mavencentral/org.apache.xmlgraphics/batik-anim/1.9.1")
        );
        assert_eq!(
            parse("pkg:github/eclipse/dash-licenses@1.0.2").as_deref(),
            Some("git/github/eclipse/dash-licenses/1.0.2")
        );
    }

    #[test]
    fn test_other_types_have_no_source() {
        assert_eq!(
            parse("pkg:deb/debian/curl@7.50.3-1?arch=i386&distro=jessie").as_deref(),
            Some("deb/-/debian/curl/7.50.3-1")
        );
        assert_eq!(
            parse("pkg:bitbucket/birkenfeld/pygments-main@244fd47e07d1014f0aed9c").as_deref(),
            Some("bitbucket/-/birkenfeld/pygments-main/244fd47e07d1014f0aed9c")
        );
    }

    #[test]
    fn test_percent_encoded_segments() {
        let id = PackageUrlIdParser
            .parse_id("pkg:npm/%40angular/animation@12.3.1#dist")
            .unwrap();
        assert_eq!(id.as_str(), "npm/npmjs/@angular/animation/12.3.1");
        assert_eq!(id.coordinates().unwrap().namespace.as_deref(), Some("@angular"));
        assert!(id.is_valid());
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(
            parse("PKG:NPM/foobar@1.0.0").as_deref(),
            Some("npm/npmjs/-/foobar/1.0.0")
        );
    }

    #[test]
    fn test_rejects_other_notations() {
        for input in [
            "@babel/highlight@7.5.0",
            "highlight@7.5.0",
            "pkg:npm/foobar",
            "pkg:npm/foobar@",
            "pkg:npm@1.0",
            "pkg:golang/github.com/gorilla/mux@v1.8.0",
            "maven/mavencentral/org.example/thing/1.0",
        ] {
            assert_eq!(parse(input), None, "input: {}", input);
        }
    }
}
