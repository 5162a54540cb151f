//! Point-in-time fact lookups.

use crate::error::OracleError;
use chrono::NaiveDate;
use oracle_storage::StorageService;
use oracle_types::{Fact, FactKey, FactKind, Subject};
use std::sync::Arc;
use tracing::instrument;

/// Read-only query front end over the fact store.
pub struct QueryService {
	storage: Arc<StorageService>,
}

impl QueryService {
	pub fn new(storage: Arc<StorageService>) -> Self {
		Self { storage }
	}

	/// Spot price of `subject` recorded for exactly `date`.
	#[instrument(skip(self), level = "debug")]
	pub async fn query_spot(
		&self,
		subject: &Subject,
		date: NaiveDate,
	) -> Result<Fact, OracleError> {
		self.query(&FactKey::new(subject.clone(), date, FactKind::Spot))
			.await
	}

	/// Volatility of `subject` recorded for exactly `date`.
	#[instrument(skip(self), level = "debug")]
	pub async fn query_volatility(
		&self,
		subject: &Subject,
		date: NaiveDate,
	) -> Result<Fact, OracleError> {
		self.query(&FactKey::new(subject.clone(), date, FactKind::Volatility))
			.await
	}

	pub async fn query(&self, key: &FactKey) -> Result<Fact, OracleError> {
		Ok(self.storage.lookup(key).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::fixtures;

	fn service() -> QueryService {
		QueryService::new(Arc::new(fixtures::storage()))
	}

	#[tokio::test]
	async fn test_successful_spot_query() {
		let fact = service()
			.query_spot(&fixtures::company_stock_1(), fixtures::current_date())
			.await
			.unwrap();
		assert_eq!(fact.value, fixtures::dollars(3));
		assert_eq!(fact.kind, FactKind::Spot);
	}

	#[tokio::test]
	async fn test_successful_volatility_query() {
		let fact = service()
			.query_volatility(&fixtures::company_stock_1(), fixtures::current_date())
			.await
			.unwrap();
		assert_eq!(fact.value, fixtures::volatility(4, 1));
	}

	#[tokio::test]
	async fn test_every_known_fact_is_returned() {
		let service = service();
		for fact in fixtures::known_spots()
			.into_iter()
			.chain(fixtures::known_volatilities())
		{
			let found = match fact.kind {
				FactKind::Spot => service.query_spot(&fact.subject, fact.as_of).await,
				FactKind::Volatility => service.query_volatility(&fact.subject, fact.as_of).await,
			};
			assert_eq!(found.unwrap(), fact);
		}
	}

	#[tokio::test]
	async fn test_unknown_date_not_found() {
		let tomorrow = fixtures::current_date().succ_opt().unwrap();
		let result = service()
			.query_spot(&fixtures::company_stock_1(), tomorrow)
			.await;
		assert!(matches!(result, Err(OracleError::NotFound(_))));
	}

	#[tokio::test]
	async fn test_unknown_subject_not_found() {
		let result = service()
			.query_volatility(&Subject::new("UNKNOWN"), fixtures::current_date())
			.await;
		assert!(matches!(
			result,
			Err(OracleError::NotFound(key)) if key.kind == FactKind::Volatility
		));
	}
}
