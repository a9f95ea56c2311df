use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use crate::error::InvalidArgument;
use crate::license::ApprovedLicenses;
use crate::provider::{clearlydefined, foundation, ClearlyDefinedProvider, FoundationProvider};
use crate::provider::LicenseDataProvider;
use crate::resolver::{FailureMode, ResolveOptions, DEFAULT_BATCH_SIZE, DEFAULT_TIMEOUT};

/// Root configuration structure, deserialized from `.license-resolver/config.toml`.
///
/// Every section and key is optional; missing values take the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub policy: PolicyConfig,
    pub resolver: ResolverConfig,
    pub providers: ProvidersConfig,
}

/// The approved-license set.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    /// License identifiers accepted as-is. Falls back to
    /// [`ApprovedLicenses::default`] when absent.
    pub approved: Option<Vec<String>>,
}

impl PolicyConfig {
    pub fn approved_licenses(&self) -> ApprovedLicenses {
        match &self.approved {
            Some(ids) => ApprovedLicenses::new(ids.iter().cloned()),
            None => ApprovedLicenses::default(),
        }
    }
}

/// How the resolution pipeline talks to providers.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Ids sent per provider request.
    pub batch_size: usize,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    pub failure_mode: FailureMode,
    pub max_concurrent_batches: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            failure_mode: FailureMode::BestEffort,
            max_concurrent_batches: 1,
        }
    }
}

impl ResolverConfig {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            batch_size: self.batch_size,
            timeout: Duration::from_secs(self.timeout_secs),
            failure_mode: self.failure_mode,
            max_concurrent_batches: self.max_concurrent_batches,
        }
    }
}

/// A license data provider that can appear in `providers.order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Foundation,
    ClearlyDefined,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Foundation => "foundation",
            ProviderKind::ClearlyDefined => "clearlydefined",
        }
    }
}

/// Which providers to ask, in which order, and where they live.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    /// Priority order; earlier providers take precedence. Each provider may
    /// appear at most once.
    pub order: Vec<ProviderKind>,
    /// Blank disables the foundation provider.
    pub foundation_url: String,
    pub clearlydefined_url: String,
    /// Minimum ClearlyDefined score for an automatic approval.
    pub confidence_threshold: u32,
    /// Project on whose behalf the foundation is queried.
    pub project: Option<String>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            order: vec![ProviderKind::Foundation, ProviderKind::ClearlyDefined],
            foundation_url: foundation::DEFAULT_URL.to_string(),
            clearlydefined_url: clearlydefined::DEFAULT_URL.to_string(),
            confidence_threshold: clearlydefined::DEFAULT_CONFIDENCE_THRESHOLD,
            project: None,
        }
    }
}

impl ProvidersConfig {
    /// Reject an `order` that names a provider twice: the second entry would
    /// ask the same service again about everything it did not approve.
    pub fn check_order(&self) -> Result<(), InvalidArgument> {
        for (i, kind) in self.order.iter().enumerate() {
            if self.order[..i].contains(kind) {
                return Err(InvalidArgument(format!(
                    "provider `{}` is listed more than once in providers.order",
                    kind.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Instantiate the configured providers in priority order.
    pub fn build(
        &self,
        client: &Client,
        policy: Arc<ApprovedLicenses>,
    ) -> Result<Vec<Box<dyn LicenseDataProvider>>, InvalidArgument> {
        self.check_order()?;
        let providers = self
            .order
            .iter()
            .map(|kind| -> Box<dyn LicenseDataProvider> {
                match kind {
                    ProviderKind::Foundation => Box::new(FoundationProvider::new(
                        client.clone(),
                        self.foundation_url.clone(),
                        self.project.clone(),
                    )),
                    ProviderKind::ClearlyDefined => Box::new(ClearlyDefinedProvider::new(
                        client.clone(),
                        self.clearlydefined_url.clone(),
                        policy.clone(),
                        self.confidence_threshold,
                    )),
                }
            })
            .collect();
        Ok(providers)
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.license-resolver/config.toml`
/// 3. `~/.config/license-resolver/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-resolver").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-resolver")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))?;
    config
        .providers
        .check_order()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        let options = cfg.resolver.resolve_options();
        assert_eq!(options.batch_size, 1000);
        assert_eq!(options.timeout, Duration::from_secs(60));
        assert_eq!(options.failure_mode, FailureMode::BestEffort);
        assert_eq!(
            cfg.providers.order,
            vec![ProviderKind::Foundation, ProviderKind::ClearlyDefined]
        );
        assert!(!cfg.policy.approved_licenses().is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
[policy]
approved = ["MIT", "EPL-2.0"]

[resolver]
batch_size = 250
failure_mode = "fail-fast"

[providers]
order = ["clearlydefined"]
confidence_threshold = 75
"#,
        )
        .unwrap();

        assert_eq!(cfg.policy.approved_licenses().len(), 2);
        assert_eq!(cfg.resolver.batch_size, 250);
        assert_eq!(cfg.resolver.timeout_secs, 60);
        assert_eq!(cfg.resolver.failure_mode, FailureMode::FailFast);
        assert_eq!(cfg.providers.order, vec![ProviderKind::ClearlyDefined]);
        assert_eq!(cfg.providers.confidence_threshold, 75);
        assert_eq!(cfg.providers.foundation_url, foundation::DEFAULT_URL);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            r#"
[providers]
order = ["foundation", "mystery"]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_build_respects_order() {
        let cfg = ProvidersConfig {
            order: vec![ProviderKind::ClearlyDefined, ProviderKind::Foundation],
            ..ProvidersConfig::default()
        };
        let providers = cfg
            .build(&Client::new(), Arc::new(ApprovedLicenses::default()))
            .unwrap();
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["clearlydefined", "foundation"]);
    }

    #[test]
    fn test_duplicate_provider_is_rejected() {
        let cfg: Config = toml::from_str(
            r#"
[providers]
order = ["foundation", "clearlydefined", "foundation"]
"#,
        )
        .unwrap();
        let err = cfg
            .providers
            .build(&Client::new(), Arc::new(ApprovedLicenses::default()))
            .err()
            .unwrap();
        assert!(err.to_string().contains("`foundation`"));

        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[providers]\norder = [\"clearlydefined\", \"clearlydefined\"]").unwrap();
        let err = load_config(Path::new("."), Some(f.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("`clearlydefined` is listed more than once"));
    }

    #[test]
    fn test_override_path_wins() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[resolver]\nbatch_size = 10").unwrap();
        let dir = tempdir().unwrap();
        let cfg = load_config(dir.path(), Some(f.path())).unwrap();
        assert_eq!(cfg.resolver.batch_size, 10);
    }

    #[test]
    fn test_project_config_is_discovered() {
        let dir = tempdir().unwrap();
        let cfg_dir = dir.path().join(".license-resolver");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(cfg_dir.join("config.toml"), "[resolver]\ntimeout_secs = 5\n").unwrap();
        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.resolver.timeout_secs, 5);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[resolver]\nbatch_size = \"lots\"").unwrap();
        let err = load_config(Path::new("."), Some(f.path())).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }
}
