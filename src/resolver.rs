//! The license resolution pipeline.
//!
//! # Flow
//! 1. One [`LicenseData`] per distinct requested id (first occurrence wins).
//! 2. For each provider, in priority order:
//!    - snapshot the valid ids that are not yet approved;
//!    - skip the provider when the snapshot is empty;
//!    - batch the snapshot ([`Batches`]) and query once per batch, each call
//!      bounded by the configured timeout;
//!    - merge every answer into the matching [`LicenseData`].
//! 3. Return the map. Ids no provider knew about stay [`Status::Unresolved`].
//!
//! An id approved by an earlier provider is never sent to a later one, so
//! later providers cannot override an approval. Batches for one provider may
//! run concurrently (`max_concurrent_batches`), but their answers are merged
//! in batch order and each id belongs to exactly one batch, so the result
//! does not depend on response timing.

use std::collections::HashSet;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::batch::Batches;
use crate::error::{InvalidArgument, ProviderError, ResolveError};
use crate::models::{ContentData, ContentId, LicenseData, LicenseMap, Status};
use crate::provider::LicenseDataProvider;

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// What a provider failure does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    /// Log the failure; the batch's ids stay unresolved by this provider and
    /// the run continues.
    #[default]
    BestEffort,
    /// Abort the run and hand back the partial results.
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    pub batch_size: usize,
    /// Upper bound on each provider call.
    pub timeout: Duration,
    pub failure_mode: FailureMode,
    /// Batches in flight per provider; 1 runs them one at a time.
    pub max_concurrent_batches: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT,
            failure_mode: FailureMode::BestEffort,
            max_concurrent_batches: 1,
        }
    }
}

impl ResolveOptions {
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        if self.batch_size == 0 {
            return Err(InvalidArgument("batch size must be at least 1".into()));
        }
        if self.max_concurrent_batches == 0 {
            return Err(InvalidArgument(
                "max concurrent batches must be at least 1".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(InvalidArgument("timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Resolves ids against an ordered list of providers; earlier providers win.
pub struct LicenseResolver {
    providers: Vec<Box<dyn LicenseDataProvider>>,
    options: ResolveOptions,
}

impl LicenseResolver {
    pub fn new(providers: Vec<Box<dyn LicenseDataProvider>>, options: ResolveOptions) -> Self {
        LicenseResolver { providers, options }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn resolve<I>(&self, ids: I) -> Result<LicenseMap, ResolveError>
    where
        I: IntoIterator<Item = ContentId>,
    {
        self.options.validate()?;

        let mut results = LicenseMap::new();
        let mut order = Vec::new();
        for id in ids {
            if !results.contains_key(&id) {
                results.insert(id.clone(), LicenseData::new(id.clone()));
                order.push(id);
            }
        }

        for provider in &self.providers {
            let pending: Vec<ContentId> = order
                .iter()
                .filter(|id| id.is_valid())
                .filter(|id| results.get(*id).map(LicenseData::status) != Some(Status::Approved))
                .cloned()
                .collect();

            if pending.is_empty() {
                debug!("Skipping {}: nothing left to resolve.", provider.name());
                continue;
            }

            debug!("Asking {} about {} items.", provider.name(), pending.len());

            let batches = Batches::new(pending, self.options.batch_size)?;
            let mut answers = stream::iter(batches)
                .map(|batch| self.query_batch(provider.as_ref(), batch))
                .buffered(self.options.max_concurrent_batches);

            while let Some((batch, outcome)) = answers.next().await {
                match outcome {
                    Ok(found) => merge(&mut results, &batch, found, provider.name()),
                    Err(err) => match self.options.failure_mode {
                        FailureMode::BestEffort => warn!(
                            "{} failed for a batch of {} items; continuing without it: {}",
                            provider.name(),
                            batch.len(),
                            err
                        ),
                        FailureMode::FailFast => {
                            return Err(ResolveError::ProviderUnavailable {
                                provider: provider.name().to_string(),
                                source: err,
                                partial: results,
                            });
                        }
                    },
                }
            }
        }

        let unresolved = results
            .values()
            .filter(|d| d.status() == Status::Unresolved)
            .count();
        info!(
            "Resolved {} items ({} unresolved).",
            results.len(),
            unresolved
        );

        Ok(results)
    }

    async fn query_batch(
        &self,
        provider: &dyn LicenseDataProvider,
        batch: Vec<ContentId>,
    ) -> (Vec<ContentId>, Result<Vec<ContentData>, ProviderError>) {
        let mut found = Vec::new();
        let mut collect = |data: ContentData| found.push(data);
        let call = provider.query_license_data(&batch, &mut collect);
        let outcome = match tokio::time::timeout(self.options.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.options.timeout)),
        };
        (batch, outcome.map(|()| found))
    }
}

/// Fold a provider's answers for one batch into the results. Observations
/// accumulate; answers about ids outside the batch are dropped.
fn merge(results: &mut LicenseMap, batch: &[ContentId], found: Vec<ContentData>, provider: &str) {
    let requested: HashSet<&ContentId> = batch.iter().collect();
    for data in found {
        if !requested.contains(&data.id) {
            warn!("{} answered for {}, which was not asked for; ignoring.", provider, data.id);
            continue;
        }
        if let Some(entry) = results.get_mut(&data.id) {
            entry.add_content_data(data);
        }
    }
}
