//! `license-resolver`: decide whether third-party components carry licenses
//! acceptable under an approved-license policy.
//!
//! # Flow
//! 1. Read component ids from a dependency list ([`ids`]).
//! 2. Ask each license data provider, in priority order, about the ids that
//!    are not yet approved ([`resolver`], [`provider`], [`batch`]).
//! 3. Judge license expressions against the approved set ([`license`]).
//! 4. Report one [`models::LicenseData`] per id ([`report`]).

pub mod batch;
pub mod config;
pub mod error;
pub mod ids;
pub mod license;
pub mod models;
pub mod provider;
pub mod report;
pub mod resolver;

pub use error::{InvalidArgument, ProviderError, ResolveError};
pub use license::{parse, ApprovedLicenses, LicenseExpression};
pub use models::{ContentData, ContentId, ContentStatus, LicenseData, LicenseMap, Status};
pub use provider::LicenseDataProvider;
pub use resolver::{FailureMode, LicenseResolver, ResolveOptions};
