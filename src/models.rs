use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize, Serializer};

/// The five coordinates that identify a unit of third-party content,
/// e.g. `maven/mavencentral/io.netty/netty-transport/4.1.42`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinates {
    /// Ecosystem type (`maven`, `npm`, `pypi`, `p2`, ...).
    pub kind: String,
    /// Where the content is published (`mavencentral`, `npmjs`, ...).
    pub source: String,
    /// Optional sub-namespace (Maven group, npm scope). Rendered as `-` when absent.
    pub namespace: Option<String>,
    pub name: String,
    pub version: String,
}

impl Coordinates {
    /// Well-formed shape: every part present, no whitespace, no path separator.
    pub fn is_well_formed(&self) -> bool {
        let namespace_ok = self.namespace.as_deref().map_or(true, is_segment);
        namespace_ok
            && is_segment(&self.kind)
            && is_segment(&self.source)
            && is_segment(&self.name)
            && is_segment(&self.version)
    }

    fn canonical(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.kind,
            self.source,
            self.namespace.as_deref().unwrap_or("-"),
            self.name,
            self.version
        )
    }
}

fn is_segment(part: &str) -> bool {
    !part.is_empty() && !part.contains('/') && !part.chars().any(char::is_whitespace)
}

/// Immutable identifier of a component, compared and hashed by its canonical string.
///
/// Input that could not be mapped onto [`Coordinates`] is still representable
/// (see [`ContentId::invalid`]) so that it can surface in the final report.
#[derive(Debug, Clone)]
pub struct ContentId {
    canonical: String,
    coordinates: Option<Coordinates>,
}

impl ContentId {
    pub fn new(
        kind: &str,
        source: &str,
        namespace: Option<&str>,
        name: &str,
        version: &str,
    ) -> Self {
        let coordinates = Coordinates {
            kind: kind.to_string(),
            source: source.to_string(),
            namespace: namespace.filter(|ns| *ns != "-").map(str::to_string),
            name: name.to_string(),
            version: version.to_string(),
        };
        Self::from_coordinates(coordinates)
    }

    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        ContentId {
            canonical: coordinates.canonical(),
            coordinates: Some(coordinates),
        }
    }

    /// Wrap raw input that no id parser recognised.
    pub fn invalid(raw: &str) -> Self {
        ContentId {
            canonical: raw.trim().to_string(),
            coordinates: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.coordinates
            .as_ref()
            .is_some_and(Coordinates::is_well_formed)
    }

    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.coordinates.as_ref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.coordinates.as_ref().map(|c| c.kind.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for ContentId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for ContentId {}

impl Hash for ContentId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for ContentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ContentId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

/// Verdict carried by a single provider observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Approved,
    Restricted,
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentStatus::Approved => write!(f, "approved"),
            ContentStatus::Restricted => write!(f, "restricted"),
        }
    }
}

/// Aggregate status of a component after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Approved,
    Restricted,
    /// No provider had any information about the component.
    Unresolved,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Approved => write!(f, "approved"),
            Status::Restricted => write!(f, "restricted"),
            Status::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// One observation about a component, as answered by a license data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentData {
    pub id: ContentId,
    /// License expression exactly as the provider reported it.
    pub license: String,
    /// Provider confidence in the license determination.
    pub score: u32,
    pub status: ContentStatus,
    /// Reference backing the determination (review ticket, `clearlydefined`, ...).
    pub authority: String,
    pub url: Option<String>,
}

impl ContentData {
    pub fn new(
        id: ContentId,
        license: impl Into<String>,
        score: u32,
        status: ContentStatus,
        authority: impl Into<String>,
    ) -> Self {
        ContentData {
            id,
            license: license.into(),
            score,
            status,
            authority: authority.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Accumulated observations for one requested component.
///
/// Observations are only ever appended, so the derived [`Status`] moves
/// monotonically from `Unresolved` towards `Approved`.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseData {
    id: ContentId,
    content_data: Vec<ContentData>,
}

impl LicenseData {
    pub fn new(id: ContentId) -> Self {
        LicenseData {
            id,
            content_data: Vec::new(),
        }
    }

    pub fn id(&self) -> &ContentId {
        &self.id
    }

    pub fn add_content_data(&mut self, data: ContentData) {
        self.content_data.push(data);
    }

    pub fn content_data(&self) -> &[ContentData] {
        &self.content_data
    }

    pub fn status(&self) -> Status {
        if self
            .content_data
            .iter()
            .any(|d| d.status == ContentStatus::Approved)
        {
            Status::Approved
        } else if self.content_data.is_empty() {
            Status::Unresolved
        } else {
            Status::Restricted
        }
    }

    pub fn license(&self) -> Option<&str> {
        self.primary().map(|d| d.license.as_str())
    }

    pub fn authority(&self) -> Option<&str> {
        self.primary().map(|d| d.authority.as_str())
    }

    pub fn url(&self) -> Option<&str> {
        self.primary().and_then(|d| d.url.as_deref())
    }

    /// The observation that backs the reported license and authority: the
    /// highest-score approved observation (earliest on ties), else the last one seen.
    fn primary(&self) -> Option<&ContentData> {
        let mut best: Option<&ContentData> = None;
        for data in self
            .content_data
            .iter()
            .filter(|d| d.status == ContentStatus::Approved)
        {
            if best.map_or(true, |b| data.score > b.score) {
                best = Some(data);
            }
        }
        best.or_else(|| self.content_data.last())
    }
}

/// Resolution output: exactly one entry per distinct requested id.
pub type LicenseMap = BTreeMap<ContentId, LicenseData>;
