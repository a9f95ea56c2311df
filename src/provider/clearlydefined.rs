use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::ProviderError;
use crate::ids::parse_canonical;
use crate::license::ApprovedLicenses;
use crate::models::{ContentData, ContentId, ContentStatus};
use crate::provider::{check_status, LicenseDataProvider, OnResult, USER_AGENT};

pub const DEFAULT_URL: &str = "https://api.clearlydefined.io/definitions";
pub const DEFAULT_CONFIDENCE_THRESHOLD: u32 = 60;

const AUTHORITY: &str = "clearlydefined";

/// Harvested license data from the ClearlyDefined definitions API.
///
/// ClearlyDefined answers a definition for every id it is asked about; ids
/// it knows nothing about come back with a score of zero and end up
/// restricted. Approval is decided locally against the approved set.
pub struct ClearlyDefinedProvider {
    client: Client,
    url: String,
    policy: Arc<ApprovedLicenses>,
    confidence_threshold: u32,
}

impl ClearlyDefinedProvider {
    pub fn new(
        client: Client,
        url: impl Into<String>,
        policy: Arc<ApprovedLicenses>,
        confidence_threshold: u32,
    ) -> Self {
        ClearlyDefinedProvider {
            client,
            url: url.into(),
            policy,
            confidence_threshold,
        }
    }

    async fn query(&self, ids: &[ContentId], on_result: OnResult<'_>) -> Result<(), ProviderError> {
        let supported: Vec<&str> = ids
            .iter()
            .filter(|id| is_supported(id))
            .map(ContentId::as_str)
            .collect();
        if supported.is_empty() {
            return Ok(());
        }

        info!(
            "Querying ClearlyDefined for license data for {} items.",
            supported.len()
        );

        let response = self
            .client
            .post(&self.url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .json(&supported)
            .send()
            .await?;

        check_status(&response)?;

        let body = response.text().await?;
        let definitions = self.decode_response(&body)?;
        info!("Found {} items.", definitions.len());

        for data in definitions {
            on_result(data);
        }
        Ok(())
    }

    /// The response is an object keyed by the requested ids, each value a
    /// full ClearlyDefined definition.
    fn decode_response(&self, body: &str) -> Result<Vec<ContentData>, ProviderError> {
        let data: Value =
            serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        let entries = data
            .as_object()
            .ok_or_else(|| ProviderError::Decode("expected a JSON object".into()))?;

        let mut definitions = Vec::new();
        for (key, definition) in entries {
            let Some(id) = parse_canonical(key) else {
                warn!("Skipping ClearlyDefined definition with unreadable id {}", key);
                continue;
            };
            let content = self.decode_definition(id, definition);
            debug!(
                "ClearlyDefined {}: {} score: {} {}",
                content.status, content.id, content.score, content.license
            );
            definitions.push(content);
        }
        Ok(definitions)
    }

    fn decode_definition(&self, id: ContentId, definition: &Value) -> ContentData {
        let declared = declared_license(definition);
        let status = if self.is_accepted(definition, &declared) {
            ContentStatus::Approved
        } else {
            ContentStatus::Restricted
        };
        let url = format!("https://clearlydefined.io/definitions/{}", id);
        ContentData::new(id, declared, license_score(definition), status, AUTHORITY).with_url(url)
    }

    /// Accepted when either score clears the threshold, the declared license
    /// is approved, and every discovered license (other than `NONE`) is too.
    fn is_accepted(&self, definition: &Value, declared: &str) -> bool {
        let confident = effective_score(definition) >= self.confidence_threshold
            || license_score(definition) >= self.confidence_threshold;
        if !confident {
            return false;
        }
        if self.policy.status_of(declared) != ContentStatus::Approved {
            return false;
        }
        discovered_licenses(definition)
            .into_iter()
            .filter(|license| *license != "NONE")
            .all(|license| self.policy.status_of(license) == ContentStatus::Approved)
    }
}

impl LicenseDataProvider for ClearlyDefinedProvider {
    fn name(&self) -> &str {
        "clearlydefined"
    }

    fn query_license_data<'a>(
        &'a self,
        ids: &'a [ContentId],
        on_result: OnResult<'a>,
    ) -> BoxFuture<'a, Result<(), ProviderError>> {
        Box::pin(self.query(ids, on_result))
    }
}

/// ClearlyDefined rejects the whole request when it sees a type it does not
/// know. Eclipse p2 content is the one we know it does not carry.
fn is_supported(id: &ContentId) -> bool {
    id.kind() != Some("p2")
}

fn declared_license(definition: &Value) -> String {
    definition
        .pointer("/licensed/declared")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn license_score(definition: &Value) -> u32 {
    score_at(definition, "/licensed/score/total")
}

fn effective_score(definition: &Value) -> u32 {
    score_at(definition, "/scores/effective")
}

fn score_at(definition: &Value, pointer: &str) -> u32 {
    definition
        .pointer(pointer)
        .and_then(Value::as_u64)
        .map_or(0, |n| n.min(u32::MAX as u64) as u32)
}

fn discovered_licenses(definition: &Value) -> Vec<&str> {
    definition
        .pointer("/licensed/facets/core/discovered/expressions")
        .and_then(Value::as_array)
        .map(|exprs| exprs.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(url: &str) -> ClearlyDefinedProvider {
        ClearlyDefinedProvider::new(
            Client::new(),
            url,
            Arc::new(ApprovedLicenses::new(["MIT", "Apache-2.0"])),
            DEFAULT_CONFIDENCE_THRESHOLD,
        )
    }

    fn write() -> ContentId {
        ContentId::new("npm", "npmjs", None, "write", "1.0.3")
    }

    fn definition(declared: &str, total: u64, effective: u64, discovered: &[&str]) -> Value {
        json!({
            "licensed": {
                "declared": declared,
                "facets": { "core": { "discovered": { "expressions": discovered, "unknown": 0 } } },
                "score": { "total": total }
            },
            "scores": { "effective": effective, "tool": effective }
        })
    }

    #[test]
    fn test_accepts_confident_approved_definition() {
        let p = provider(DEFAULT_URL);
        let data = p.decode_definition(write(), &definition("MIT", 94, 97, &["MIT", "NONE"]));
        assert_eq!(data.status, ContentStatus::Approved);
        assert_eq!(data.license, "MIT");
        assert_eq!(data.score, 94);
        assert_eq!(data.authority, "clearlydefined");
        assert_eq!(
            data.url.as_deref(),
            Some("https://clearlydefined.io/definitions/npm/npmjs/-/write/1.0.3")
        );
    }

    #[test]
    fn test_either_score_may_clear_threshold() {
        let p = provider(DEFAULT_URL);
        let low_total = definition("MIT", 10, 80, &[]);
        let low_effective = definition("MIT", 80, 10, &[]);
        let both_low = definition("MIT", 59, 59, &[]);
        assert_eq!(p.decode_definition(write(), &low_total).status, ContentStatus::Approved);
        assert_eq!(p.decode_definition(write(), &low_effective).status, ContentStatus::Approved);
        assert_eq!(p.decode_definition(write(), &both_low).status, ContentStatus::Restricted);
    }

    #[test]
    fn test_unapproved_discovered_license_restricts() {
        let p = provider(DEFAULT_URL);
        let data = p.decode_definition(write(), &definition("MIT", 90, 90, &["MIT", "GPL-3.0-only"]));
        assert_eq!(data.status, ContentStatus::Restricted);
    }

    #[test]
    fn test_unknown_definition_is_restricted() {
        let p = provider(DEFAULT_URL);
        let data = p.decode_definition(write(), &json!({ "_id": "npm/npmjs/-/write/1.0.3" }));
        assert_eq!(data.status, ContentStatus::Restricted);
        assert_eq!(data.license, "");
        assert_eq!(data.score, 0);
    }

    #[test]
    fn test_p2_content_is_unsupported() {
        assert!(!is_supported(&ContentId::new("p2", "orbit", Some("p2.eclipse-plugin"), "org.jaxen", "1.1.6")));
        assert!(is_supported(&write()));
    }

    #[tokio::test]
    async fn test_query_posts_json_array() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/definitions"))
            .and(body_json(json!(["npm/npmjs/-/write/1.0.3"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "npm/npmjs/-/write/1.0.3": definition("MIT", 94, 97, &["MIT"])
            })))
            .expect(1)
            .mount(&server)
            .await;

        let p = provider(&format!("{}/definitions", server.uri()));
        let p2 = ContentId::new("p2", "orbit", Some("p2.eclipse-plugin"), "org.jaxen", "1.1.6");
        let mut found = Vec::new();
        let mut collect = |data: ContentData| found.push(data);
        p.query_license_data(&[write(), p2], &mut collect).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, write());
        assert_eq!(found[0].status, ContentStatus::Approved);
    }

    #[tokio::test]
    async fn test_only_unsupported_ids_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let p = provider(&server.uri());
        let p2 = ContentId::new("p2", "orbit", Some("p2.eclipse-plugin"), "org.jaxen", "1.1.6");
        let mut ignore = |_: ContentData| {};
        p.query_license_data(&[p2], &mut ignore).await.unwrap();
    }
}
