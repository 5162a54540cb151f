//! Request and response bodies for the oracle HTTP API.

use crate::{Fact, PublicKey, Subject};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Answer to a spot or volatility query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactResponse {
	pub subject: Subject,
	pub date: NaiveDate,
	pub value: Decimal,
}

impl From<Fact> for FactResponse {
	fn from(fact: Fact) -> Self {
		Self {
			subject: fact.subject,
			date: fact.as_of,
			value: fact.value,
		}
	}
}

/// The oracle's public identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityResponse {
	pub name: String,
	pub public_key: PublicKey,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}
