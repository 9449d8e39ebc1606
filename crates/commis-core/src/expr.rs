//! Constraint expression parsing and evaluation.
//!
//! An expression is an optional comparison operator followed by an operand,
//! e.g. `">= 1.30"`, `"!= disabled"`, or the bare form `"ubuntu"`. The bare
//! form means exact string equality and is never version-coerced; relational
//! operators always compare as versions. This is the same small textual
//! format the rulebook's constraint definitions use, so the grammar here must
//! not drift.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use crate::version::Version;

/// Comparison operator recognized at the front of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `>=` — version at least.
    Ge,
    /// `<=` — version at most.
    Le,
    /// `==` — equal, version-aware with string fallback.
    Eq,
    /// `!=` — not equal, version-aware with string fallback.
    Ne,
    /// `>` — version strictly above.
    Gt,
    /// `<` — version strictly below.
    Lt,
    /// No operator written: exact string equality.
    Exact,
}

impl Operator {
    fn token(&self) -> &'static str {
        match self {
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Exact => "",
        }
    }

    /// True for `>= <= > <`, which only ever compare versions.
    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            Operator::Ge | Operator::Le | Operator::Gt | Operator::Lt
        )
    }

    /// Whether an actual-versus-expected ordering satisfies this operator.
    fn holds_for(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Ge => ordering.is_ge(),
            Operator::Le => ordering.is_le(),
            Operator::Gt => ordering.is_gt(),
            Operator::Lt => ordering.is_lt(),
            Operator::Eq | Operator::Exact => ordering.is_eq(),
            Operator::Ne => ordering.is_ne(),
        }
    }
}

/// Error for expression text that does not fit the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// The whole expression was empty or whitespace.
    #[error("malformed expression: empty")]
    Empty,
    /// An operator token with nothing after it.
    #[error("malformed expression \"{text}\": operator \"{operator}\" has no operand")]
    MissingOperand {
        /// The offending expression text.
        text: String,
        /// The operator that was recognized.
        operator: String,
    },
}

/// Error raised while evaluating a parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A relational operator was applied to something that is not a version.
    #[error("cannot compare \"{actual}\" {operator} \"{expected}\": {side} is not a version")]
    NotAVersion {
        /// Actual value from the snapshot.
        actual: String,
        /// Operator being applied.
        operator: String,
        /// Expected operand from the expression.
        expected: String,
        /// Which side failed to parse (`"actual value"` or `"expected value"`).
        side: &'static str,
    },
}

/// A parsed constraint expression: operator plus operand.
///
/// # Example
///
/// ```
/// use commis_core::Expression;
///
/// let expr = Expression::parse(">= 1.30").unwrap();
/// assert!(expr.evaluate("1.33.5").unwrap());
/// assert!(!expr.evaluate("1.28.0").unwrap());
///
/// // Bare form: exact string match, never version-aware.
/// let bare = Expression::parse("1.30").unwrap();
/// assert!(!bare.evaluate("1.30.0").unwrap());
/// assert!(bare.evaluate("1.30").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    operator: Operator,
    operand: String,
}

impl Expression {
    /// Parses an expression from its textual form.
    ///
    /// Recognizes a leading two-character operator from `>= <= == !=`, then a
    /// single-character `>` or `<`; anything else is the bare exact-match
    /// form. The operand is the trimmed remainder.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError`] for empty input or an operator with an
    /// empty operand.
    pub fn parse(text: &str) -> Result<Self, ExpressionError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ExpressionError::Empty);
        }

        let two_char = [Operator::Ge, Operator::Le, Operator::Eq, Operator::Ne];
        let one_char = [Operator::Gt, Operator::Lt];

        let operator = two_char
            .iter()
            .chain(one_char.iter())
            .copied()
            .find(|op| trimmed.starts_with(op.token()))
            .unwrap_or(Operator::Exact);

        let operand = trimmed[operator.token().len()..].trim();
        if operand.is_empty() {
            return Err(ExpressionError::MissingOperand {
                text: text.to_string(),
                operator: operator.token().to_string(),
            });
        }

        Ok(Expression {
            operator,
            operand: operand.to_string(),
        })
    }

    /// Returns the recognized operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the operand text.
    pub fn operand(&self) -> &str {
        &self.operand
    }

    /// Evaluates this expression against an actual value.
    ///
    /// Relational operators (`>= <= > <`) parse both sides as versions and
    /// error when either side does not parse. `==`/`!=` try version-aware
    /// comparison first and fall back to exact string comparison — that
    /// asymmetry matches the rulebook format's established behavior and is
    /// deliberate. The bare form is exact string comparison, always.
    pub fn evaluate(&self, actual: &str) -> Result<bool, EvalError> {
        let ordering = if self.operator.is_relational() {
            let lhs: Version = actual
                .parse()
                .map_err(|_| self.not_a_version(actual, "actual value"))?;
            let rhs: Version = self
                .operand
                .parse()
                .map_err(|_| self.not_a_version(actual, "expected value"))?;
            lhs.cmp(&rhs)
        } else if self.operator == Operator::Exact {
            actual.cmp(self.operand.as_str())
        } else {
            self.versions(actual).map_or_else(
                || actual.cmp(self.operand.as_str()),
                |(lhs, rhs)| lhs.cmp(&rhs),
            )
        };
        Ok(self.operator.holds_for(ordering))
    }

    /// Parses both sides as versions, or `None` if either side fails.
    fn versions(&self, actual: &str) -> Option<(Version, Version)> {
        let lhs: Version = actual.parse().ok()?;
        let rhs: Version = self.operand.parse().ok()?;
        Some((lhs, rhs))
    }

    fn not_a_version(&self, actual: &str, side: &'static str) -> EvalError {
        EvalError::NotAVersion {
            actual: actual.to_string(),
            operator: self.operator.token().to_string(),
            expected: self.operand.clone(),
            side,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator == Operator::Exact {
            f.write_str(&self.operand)
        } else {
            write!(f, "{} {}", self.operator.token(), self.operand)
        }
    }
}
