//! License expressions and the approval policy.
//!
//! - [`expression`]: the [`LicenseExpression`] tree and approval matching.
//! - [`parser`]: turns a raw string into a [`LicenseExpression`], recovering
//!   malformed input into [`LicenseExpression::Invalid`].
//! - [`policy`]: the approved-license set and status decisions.

pub mod expression;
pub mod parser;
pub mod policy;

pub use expression::LicenseExpression;
pub use parser::parse;
pub use policy::ApprovedLicenses;
