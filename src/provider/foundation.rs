use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::ids::parse_canonical;
use crate::models::{ContentData, ContentId, ContentStatus};
use crate::provider::{check_status, LicenseDataProvider, OnResult, USER_AGENT};

pub const DEFAULT_URL: &str = "https://www.eclipse.org/projects/services/license_check.php";

/// Curated license data maintained by the foundation's IP team.
///
/// Answers are authoritative: an `approved` record has been vetted by a
/// human review referenced in its `authority`.
pub struct FoundationProvider {
    client: Client,
    url: String,
    project: Option<String>,
}

impl FoundationProvider {
    pub fn new(client: Client, url: impl Into<String>, project: Option<String>) -> Self {
        FoundationProvider {
            client,
            url: url.into(),
            project,
        }
    }

    async fn query(&self, ids: &[ContentId], on_result: OnResult<'_>) -> Result<(), ProviderError> {
        if ids.is_empty() {
            return Ok(());
        }
        if self.url.trim().is_empty() {
            debug!("Bypassing the foundation license check (no URL configured).");
            return Ok(());
        }

        info!("Querying the foundation for license data for {} items.", ids.len());

        let payload = request_payload(ids, self.project.as_deref());
        let response = self
            .client
            .post(&self.url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .form(&[("request", payload.to_string())])
            .send()
            .await?;

        check_status(&response)?;

        let body = response.text().await?;
        let records = decode_response(&body)?;
        info!("Found {} items.", records.len());

        for data in records {
            on_result(data);
        }
        Ok(())
    }
}

impl LicenseDataProvider for FoundationProvider {
    fn name(&self) -> &str {
        "foundation"
    }

    fn query_license_data<'a>(
        &'a self,
        ids: &'a [ContentId],
        on_result: OnResult<'a>,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(self.query(ids, on_result))
    }
}

/// `{"project": "...", "dependencies": ["maven/mavencentral/...", ...]}`
fn request_payload(ids: &[ContentId], project: Option<&str>) -> Value {
    let dependencies: Vec<&str> = ids.iter().map(ContentId::as_str).collect();
    match project {
        Some(project) => json!({ "project": project, "dependencies": dependencies }),
        None => json!({ "dependencies": dependencies }),
    }
}

/// Decode a response of the form:
///
/// ```json
/// {
///   "approved": {
///     "maven/mavencentral/com.google.guava/guava/15.0": {
///       "authority": "CQ7766", "confidence": "100", "id": "maven/mavencentral/com.google.guava/guava/15.0",
///       "license": "Apache-2.0", "status": "approved"
///     }
///   },
///   "restricted": { ... }
/// }
/// ```
///
/// Either section may be missing or an empty array.
fn decode_response(body: &str) -> Result<Vec<ContentData>, ProviderError> {
    let data: Value =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let mut records = Vec::new();
    for section in ["approved", "restricted"] {
        let Some(entries) = data.get(section).and_then(Value::as_object) else {
            continue;
        };
        for record in entries.values() {
            match decode_record(record) {
                Some(content) => {
                    debug!(
                        "Foundation {}: {} score: {} {} {}",
                        section, content.id, content.score, content.license, content.authority
                    );
                    records.push(content);
                }
                None => warn!("Skipping unreadable foundation record: {}", record),
            }
        }
    }
    Ok(records)
}

fn decode_record(record: &Value) -> Option<ContentData> {
    let id = parse_canonical(record.get("id")?.as_str()?)?;
    let license = string_field(record, "license");
    let authority = string_field(record, "authority");
    let status = if record.get("status").and_then(Value::as_str) == Some("approved") {
        ContentStatus::Approved
    } else {
        ContentStatus::Restricted
    };

    let url = authority_url(&authority);
    let content = ContentData::new(id, license, confidence(record), status, authority);
    Some(match url {
        Some(url) => content.with_url(url),
        None => content,
    })
}

fn string_field(record: &Value, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// The service sometimes answers the confidence as a string. Anything that
/// is not a non-negative integer counts as zero.
fn confidence(record: &Value) -> u32 {
    match record.get("confidence") {
        Some(Value::Number(n)) => n.as_u64().map_or(0, |n| n.min(u32::MAX as u64) as u32),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Link to the review behind an authority: `CQ<n>` is a legacy IPZilla
/// contribution questionnaire, `#<n>` an IPLab issue.
fn authority_url(authority: &str) -> Option<String> {
    fn number(s: &str) -> Option<&str> {
        (!s.is_empty() && s.chars().all(|c| c.is_ascii_digit())).then_some(s)
    }

    if let Some(cq) = authority.strip_prefix("CQ").and_then(number) {
        return Some(format!("https://dev.eclipse.org/ipzilla/show_bug.cgi?id={}", cq));
    }
    if let Some(issue) = authority.strip_prefix('#').and_then(number) {
        return Some(format!(
            "https://gitlab.eclipse.org/eclipsefdn/emo-team/iplab/-/issues/{}",
            issue
        ));
    }
    None
}
