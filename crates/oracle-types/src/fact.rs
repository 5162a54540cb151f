//! Market facts known to the oracle.
//!
//! A fact is a single timestamped value (a spot price or a volatility) for a
//! subject. Facts are keyed by `(subject, as_of, kind)` and compared exactly.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the underlying a fact is about, e.g. a stock ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(pub String);

impl Subject {
	pub fn new(name: impl Into<String>) -> Self {
		Self(name.into())
	}
}

impl From<&str> for Subject {
	fn from(name: &str) -> Self {
		Self(name.to_string())
	}
}

impl fmt::Display for Subject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// The kind of market value a fact records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
	/// Spot price of the subject.
	Spot,
	/// Annualised volatility of the subject.
	Volatility,
}

impl fmt::Display for FactKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FactKind::Spot => write!(f, "spot"),
			FactKind::Volatility => write!(f, "volatility"),
		}
	}
}

/// Lookup key for a fact. Matching is exact on every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactKey {
	pub subject: Subject,
	pub as_of: NaiveDate,
	pub kind: FactKind,
}

impl FactKey {
	pub fn new(subject: Subject, as_of: NaiveDate, kind: FactKind) -> Self {
		Self {
			subject,
			as_of,
			kind,
		}
	}
}

impl fmt::Display for FactKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {} @ {}", self.subject, self.kind, self.as_of)
	}
}

/// A recorded market value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fact {
	pub subject: Subject,
	pub as_of: NaiveDate,
	pub kind: FactKind,
	pub value: Decimal,
}

impl Fact {
	/// Creates a spot price fact.
	pub fn spot(subject: impl Into<Subject>, as_of: NaiveDate, value: Decimal) -> Self {
		Self {
			subject: subject.into(),
			as_of,
			kind: FactKind::Spot,
			value,
		}
	}

	/// Creates a volatility fact.
	pub fn volatility(subject: impl Into<Subject>, as_of: NaiveDate, value: Decimal) -> Self {
		Self {
			subject: subject.into(),
			as_of,
			kind: FactKind::Volatility,
			value,
		}
	}

	pub fn key(&self) -> FactKey {
		FactKey::new(self.subject.clone(), self.as_of, self.kind)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date() -> NaiveDate {
		NaiveDate::from_ymd_opt(2017, 7, 3).unwrap()
	}

	#[test]
	fn test_decimal_equality_ignores_scale() {
		let stored = Fact::spot("GOOG", date(), Decimal::new(3, 0));
		let claimed = Fact::spot("GOOG", date(), Decimal::new(300, 2));
		assert_eq!(stored, claimed);
	}

	#[test]
	fn test_key_includes_kind() {
		let spot = Fact::spot("GOOG", date(), Decimal::new(3, 0));
		let vol = Fact::volatility("GOOG", date(), Decimal::new(3, 0));
		assert_ne!(spot.key(), vol.key());
		assert_eq!(spot.key().to_string(), "GOOG spot @ 2017-07-03");
	}

	#[test]
	fn test_fact_serialization() {
		let fact = Fact::volatility("GOOG", date(), Decimal::new(4, 1));
		let json = serde_json::to_value(&fact).unwrap();
		assert_eq!(json["subject"], "GOOG");
		assert_eq!(json["kind"], "volatility");
		assert_eq!(json["as_of"], "2017-07-03");
		assert_eq!(json["value"], "0.4");
	}
}
