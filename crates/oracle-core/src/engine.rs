//! Attestation of filtered transactions.
//!
//! The engine signs a transaction id only after every fact claimed by every
//! oracle command in the transaction has been matched against the store.

use crate::error::OracleError;
use crate::extractor::extract_commands;
use crate::query::QueryService;
use futures::future::try_join_all;
use oracle_account::AccountService;
use oracle_types::{Fact, FilteredTransaction, TransactionSignature};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

pub struct AttestationEngine {
	query: Arc<QueryService>,
	account: Arc<AccountService>,
}

impl AttestationEngine {
	pub fn new(query: Arc<QueryService>, account: Arc<AccountService>) -> Self {
		Self { query, account }
	}

	/// Verifies the claims in `ftx` and signs its id.
	///
	/// Fails with [`OracleError::InvalidFact`] if any claimed fact is unknown
	/// or differs from the recorded value. Nothing is signed in that case.
	#[instrument(skip_all, fields(tx_id = %ftx.id))]
	pub async fn sign(
		&self,
		ftx: &FilteredTransaction,
	) -> Result<TransactionSignature, OracleError> {
		ftx.verify()?;

		let oracle_key = self.account.public_key().await?;
		let commands = extract_commands(ftx, &oracle_key);
		debug!(commands = commands.len(), "Extracted oracle commands");

		if commands.iter().any(|command| command.facts.is_empty()) {
			return Err(OracleError::InvalidFact(
				"Oracle command carries no facts".to_string(),
			));
		}

		// Lookups run concurrently; the first failure drops the rest.
		let checks = commands
			.iter()
			.flat_map(|command| command.facts.iter())
			.map(|claimed| self.check_fact(claimed));
		let checked = try_join_all(checks).await?;

		let signature = self.account.sign(&ftx.id).await?;
		info!(facts = checked.len(), "Transaction attested");

		Ok(TransactionSignature::new(oracle_key, signature))
	}

	async fn check_fact(&self, claimed: &Fact) -> Result<(), OracleError> {
		let key = claimed.key();
		let recorded = match self.query.query(&key).await {
			Ok(fact) => fact,
			Err(OracleError::NotFound(_)) => {
				warn!(%key, "Claimed fact is not recorded");
				return Err(OracleError::InvalidFact(format!("No recorded fact for {}", key)));
			}
			Err(e) => return Err(e),
		};

		if recorded.value != claimed.value {
			warn!(
				%key,
				claimed = %claimed.value,
				recorded = %recorded.value,
				"Claimed fact mismatch"
			);
			return Err(OracleError::InvalidFact(format!(
				"Claimed {} for {}, recorded {}",
				claimed.value, key, recorded.value
			)));
		}

		Ok(())
	}
}
