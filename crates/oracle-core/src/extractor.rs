//! Selection of the commands the oracle is asked to attest.

use oracle_types::{CommandData, FilteredTransaction, OracleCommand, PublicKey};

/// Returns the oracle commands in `ftx` that list `oracle_key` as a signer.
///
/// Commands are returned in transaction order. Entries the filter hid are
/// simply absent, so an empty result is not an error.
pub fn extract_commands<'a>(
	ftx: &'a FilteredTransaction,
	oracle_key: &PublicKey,
) -> Vec<&'a OracleCommand> {
	ftx.commands()
		.filter(|command| command.is_signed_by(oracle_key))
		.filter_map(|command| match &command.value {
			CommandData::Oracle(oracle_command) => Some(oracle_command),
			CommandData::Contract(_) => None,
		})
		.collect()
}
