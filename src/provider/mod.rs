//! License data providers.
//!
//! A provider answers [`ContentData`] observations for a batch of ids. Each
//! submodule talks to one upstream service over `reqwest`:
//!
//! - [`foundation`]: the foundation's curated license-check service.
//! - [`clearlydefined`]: the ClearlyDefined open-data definitions API.

pub mod clearlydefined;
pub mod foundation;

use futures::future::BoxFuture;

use crate::error::ProviderError;
use crate::models::{ContentData, ContentId};

pub use clearlydefined::ClearlyDefinedProvider;
pub use foundation::FoundationProvider;

/// Callback receiving each observation as the provider decodes it.
pub type OnResult<'a> = &'a mut (dyn FnMut(ContentData) + Send);

pub trait LicenseDataProvider: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Query license data for a non-empty batch of valid ids, invoking
    /// `on_result` zero or more times per id. Providers only answer for ids
    /// in `ids`; any transport failure is reported as an `Err` and the
    /// resolver decides whether it is fatal.
    fn query_license_data<'a>(
        &'a self,
        ids: &'a [ContentId],
        on_result: OnResult<'a>,
    ) -> BoxFuture<'a, Result<(), ProviderError>>;
}

pub const USER_AGENT: &str = concat!("license-resolver/", env!("CARGO_PKG_VERSION"));

/// Answer `Ok` for 2xx responses, or the status as a [`ProviderError`].
pub(crate) fn check_status(response: &reqwest::Response) -> Result<(), ProviderError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(ProviderError::Status {
            code: response.status().as_u16(),
        })
    }
}
