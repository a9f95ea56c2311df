use std::collections::HashSet;
use std::fmt;

/// A parsed license expression.
///
/// The tree is immutable once built. Matching is exact and case-sensitive:
/// identifiers are compared as received so that a near-miss spelling is never
/// silently taken for an approved license.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LicenseExpression {
    /// A single license identifier, e.g. `MIT`.
    Identifier(String),
    /// Both operands must be approved.
    And(Box<LicenseExpression>, Box<LicenseExpression>),
    /// At least one operand must be approved.
    Or(Box<LicenseExpression>, Box<LicenseExpression>),
    /// `identifier+`.
    ///
    /// Approved only when the identifier itself is approved: there is no
    /// registry of license versions to decide what "later" means.
    OrLater(String),
    /// Input that could not be parsed. Never approved.
    Invalid,
}

impl LicenseExpression {
    pub fn identifier(name: impl Into<String>) -> Self {
        LicenseExpression::Identifier(name.into())
    }

    pub fn and(left: LicenseExpression, right: LicenseExpression) -> Self {
        LicenseExpression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: LicenseExpression, right: LicenseExpression) -> Self {
        LicenseExpression::Or(Box::new(left), Box::new(right))
    }

    pub fn matches_approved(&self, approved: &HashSet<String>) -> bool {
        match self {
            LicenseExpression::Identifier(name) | LicenseExpression::OrLater(name) => {
                approved.contains(name)
            }
            LicenseExpression::And(left, right) => {
                left.matches_approved(approved) && right.matches_approved(approved)
            }
            LicenseExpression::Or(left, right) => {
                left.matches_approved(approved) || right.matches_approved(approved)
            }
            LicenseExpression::Invalid => false,
        }
    }

    /// Structural validity. Only [`LicenseExpression::Invalid`] answers `false`;
    /// the parser never embeds an invalid node inside a valid tree.
    pub fn is_valid(&self) -> bool {
        !matches!(self, LicenseExpression::Invalid)
    }

    /// Every binary node wrapped in parentheses, making precedence explicit.
    pub fn to_precedence_string(&self) -> String {
        match self {
            LicenseExpression::And(left, right) => format!(
                "({} AND {})",
                left.to_precedence_string(),
                right.to_precedence_string()
            ),
            LicenseExpression::Or(left, right) => format!(
                "({} OR {})",
                left.to_precedence_string(),
                right.to_precedence_string()
            ),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseExpression::Identifier(name) => f.write_str(name),
            LicenseExpression::OrLater(name) => write!(f, "{}+", name),
            LicenseExpression::Or(left, right) => write!(f, "{} OR {}", left, right),
            LicenseExpression::And(left, right) => {
                write_and_operand(f, left)?;
                f.write_str(" AND ")?;
                write_and_operand(f, right)
            }
            LicenseExpression::Invalid => f.write_str("<invalid>"),
        }
    }
}

/// An `OR` below an `AND` needs parentheses to keep its meaning.
fn write_and_operand(f: &mut fmt::Formatter<'_>, operand: &LicenseExpression) -> fmt::Result {
    match operand {
        LicenseExpression::Or(..) => write!(f, "({})", operand),
        other => write!(f, "{}", other),
    }
}
