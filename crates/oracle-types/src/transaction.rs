//! Transactions and their filtered views.
//!
//! A [`WireTransaction`] is an ordered list of [`TransactionEntry`] values.
//! Its id commits to the number of entries and to the Merkle root over one
//! leaf per entry, where every leaf is salted with a per-entry nonce so hidden
//! entries cannot be guessed from their hashes. Leaves, inner nodes and the
//! id are hashed under distinct prefixes, so none can stand in for another.
//!
//! A [`FilteredTransaction`] reveals a subset of the entries (with their
//! nonces) plus every leaf hash, which is enough to recompute and check the
//! id without seeing the rest of the transaction.

use crate::{errors::TransactionError, fact::Fact, PublicKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Keccak-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecureHash(pub [u8; 32]);

impl SecureHash {
	pub const ZERO: SecureHash = SecureHash([0u8; 32]);

	pub fn keccak256(data: &[u8]) -> Self {
		let digest = Keccak256::digest(data);
		let mut bytes = [0u8; 32];
		bytes.copy_from_slice(&digest);
		Self(bytes)
	}

	/// Hash of the concatenation of `parts`.
	pub fn keccak256_parts(parts: &[&[u8]]) -> Self {
		let mut hasher = Keccak256::new();
		for part in parts {
			hasher.update(part);
		}
		let mut bytes = [0u8; 32];
		bytes.copy_from_slice(&hasher.finalize());
		Self(bytes)
	}

	pub fn random() -> Self {
		Self(rand::random())
	}
}

impl fmt::Debug for SecureHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecureHash({})", self)
	}
}

impl fmt::Display for SecureHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{}", hex::encode(self.0))
	}
}

impl FromStr for SecureHash {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = crate::serde_helpers::decode_hex(s).map_err(|e| e.to_string())?;
		let bytes: [u8; 32] = bytes
			.try_into()
			.map_err(|v: Vec<u8>| format!("Expected 32 bytes, got {}", v.len()))?;
		Ok(Self(bytes))
	}
}

impl Serialize for SecureHash {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for SecureHash {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		value.parse().map_err(serde::de::Error::custom)
	}
}

/// Command asking the oracle to attest to the facts it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleCommand {
	pub facts: Vec<Fact>,
}

impl OracleCommand {
	/// The usual pricing pair: a spot price and a volatility.
	pub fn new(spot: Fact, volatility: Fact) -> Self {
		Self {
			facts: vec![spot, volatility],
		}
	}

	pub fn from_facts(facts: Vec<Fact>) -> Self {
		Self { facts }
	}
}

/// Any other contract command. Opaque to the oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCommand {
	pub name: String,
}

impl ContractCommand {
	pub fn new(name: impl Into<String>) -> Self {
		Self { name: name.into() }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandData {
	Oracle(OracleCommand),
	Contract(ContractCommand),
}

/// A command together with the keys required to sign for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
	pub value: CommandData,
	pub signers: Vec<PublicKey>,
}

impl Command {
	pub fn new(value: CommandData, signers: Vec<PublicKey>) -> Self {
		Self { value, signers }
	}

	pub fn oracle(command: OracleCommand, signers: Vec<PublicKey>) -> Self {
		Self::new(CommandData::Oracle(command), signers)
	}

	pub fn contract(name: impl Into<String>, signers: Vec<PublicKey>) -> Self {
		Self::new(CommandData::Contract(ContractCommand::new(name)), signers)
	}

	pub fn is_signed_by(&self, key: &PublicKey) -> bool {
		self.signers.contains(key)
	}
}

/// An output state governed by a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
	pub contract: String,
	pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
	pub from: Option<DateTime<Utc>>,
	pub until: Option<DateTime<Utc>>,
}

/// One component of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionEntry {
	State(StateEntry),
	Command(Command),
	Attachment(SecureHash),
	Notary(String),
	TimeWindow(TimeWindow),
}

impl TransactionEntry {
	pub fn as_command(&self) -> Option<&Command> {
		match self {
			TransactionEntry::Command(command) => Some(command),
			_ => None,
		}
	}
}

const LEAF_PREFIX: u8 = 0x00;
const NODE_PREFIX: u8 = 0x01;
const ID_PREFIX: u8 = 0x02;

fn component_nonce(salt: &SecureHash, index: usize) -> SecureHash {
	SecureHash::keccak256_parts(&[&salt.0[..], &(index as u64).to_be_bytes()[..]])
}

fn leaf_hash(nonce: &SecureHash, entry: &TransactionEntry) -> Result<SecureHash, TransactionError> {
	let encoded =
		serde_json::to_vec(entry).map_err(|e| TransactionError::Serialization(e.to_string()))?;
	Ok(SecureHash::keccak256_parts(&[
		&[LEAF_PREFIX][..],
		&nonce.0[..],
		encoded.as_slice(),
	]))
}

fn node_hash(left: &SecureHash, right: &SecureHash) -> SecureHash {
	SecureHash::keccak256_parts(&[&[NODE_PREFIX][..], &left.0[..], &right.0[..]])
}

/// Merkle root over `leaves`, padded with zero hashes to a power of two.
/// The root of no leaves is [`SecureHash::ZERO`].
pub fn merkle_root(leaves: &[SecureHash]) -> SecureHash {
	if leaves.is_empty() {
		return SecureHash::ZERO;
	}

	let mut level = leaves.to_vec();
	level.resize(leaves.len().next_power_of_two(), SecureHash::ZERO);
	while level.len() > 1 {
		level = level
			.chunks(2)
			.map(|pair| node_hash(&pair[0], &pair[1]))
			.collect();
	}
	level[0]
}

/// Transaction id over `leaves`: the leaf count followed by their Merkle root.
pub fn transaction_id(leaves: &[SecureHash]) -> SecureHash {
	let root = merkle_root(leaves);
	SecureHash::keccak256_parts(&[
		&[ID_PREFIX][..],
		&(leaves.len() as u64).to_be_bytes()[..],
		&root.0[..],
	])
}

/// A complete transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTransaction {
	pub entries: Vec<TransactionEntry>,
	pub privacy_salt: SecureHash,
}

impl WireTransaction {
	pub fn leaf_hashes(&self) -> Result<Vec<SecureHash>, TransactionError> {
		self.entries
			.iter()
			.enumerate()
			.map(|(index, entry)| leaf_hash(&component_nonce(&self.privacy_salt, index), entry))
			.collect()
	}

	pub fn id(&self) -> Result<SecureHash, TransactionError> {
		Ok(transaction_id(&self.leaf_hashes()?))
	}

	/// Builds a view that reveals only the entries accepted by `predicate`.
	pub fn build_filtered<F>(&self, predicate: F) -> Result<FilteredTransaction, TransactionError>
	where
		F: Fn(&TransactionEntry) -> bool,
	{
		let leaf_hashes = self.leaf_hashes()?;
		let components = self
			.entries
			.iter()
			.enumerate()
			.filter(|(_, entry)| predicate(entry))
			.map(|(index, entry)| FilteredComponent {
				index,
				nonce: component_nonce(&self.privacy_salt, index),
				entry: entry.clone(),
			})
			.collect();

		Ok(FilteredTransaction {
			id: transaction_id(&leaf_hashes),
			leaf_hashes,
			components,
		})
	}
}

/// A revealed entry and the nonce needed to recompute its leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredComponent {
	pub index: usize,
	pub nonce: SecureHash,
	pub entry: TransactionEntry,
}

/// A redacted transaction that still commits to the full transaction id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredTransaction {
	pub id: SecureHash,
	pub leaf_hashes: Vec<SecureHash>,
	pub components: Vec<FilteredComponent>,
}

impl FilteredTransaction {
	/// Checks that every revealed entry is committed to by `id`.
	pub fn verify(&self) -> Result<(), TransactionError> {
		let len = self.leaf_hashes.len();
		let mut previous: Option<usize> = None;

		for component in &self.components {
			if component.index >= len {
				return Err(TransactionError::ComponentOutOfRange {
					index: component.index,
					len,
				});
			}
			if previous.is_some_and(|p| p >= component.index) {
				return Err(TransactionError::UnorderedComponents);
			}
			previous = Some(component.index);

			if leaf_hash(&component.nonce, &component.entry)? != self.leaf_hashes[component.index] {
				return Err(TransactionError::ComponentMismatch(component.index));
			}
		}

		if transaction_id(&self.leaf_hashes) != self.id {
			return Err(TransactionError::RootMismatch);
		}

		Ok(())
	}

	/// Revealed entries in transaction order.
	pub fn entries(&self) -> impl Iterator<Item = &TransactionEntry> {
		self.components.iter().map(|c| &c.entry)
	}

	/// Revealed commands in transaction order.
	pub fn commands(&self) -> impl Iterator<Item = &Command> {
		self.entries().filter_map(TransactionEntry::as_command)
	}
}

/// Assembles a [`WireTransaction`] item by item.
#[derive(Debug, Default)]
pub struct TransactionBuilder {
	entries: Vec<TransactionEntry>,
	privacy_salt: Option<SecureHash>,
}

impl TransactionBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_notary(mut self, notary: impl Into<String>) -> Self {
		self.entries.push(TransactionEntry::Notary(notary.into()));
		self
	}

	pub fn with_state(mut self, contract: impl Into<String>, data: serde_json::Value) -> Self {
		self.entries.push(TransactionEntry::State(StateEntry {
			contract: contract.into(),
			data,
		}));
		self
	}

	pub fn with_command(mut self, command: Command) -> Self {
		self.entries.push(TransactionEntry::Command(command));
		self
	}

	pub fn with_attachment(mut self, attachment: SecureHash) -> Self {
		self.entries.push(TransactionEntry::Attachment(attachment));
		self
	}

	pub fn with_time_window(mut self, window: TimeWindow) -> Self {
		self.entries.push(TransactionEntry::TimeWindow(window));
		self
	}

	/// Fixes the privacy salt instead of drawing a random one.
	pub fn with_privacy_salt(mut self, salt: SecureHash) -> Self {
		self.privacy_salt = Some(salt);
		self
	}

	pub fn to_wire_transaction(self) -> WireTransaction {
		WireTransaction {
			entries: self.entries,
			privacy_salt: self.privacy_salt.unwrap_or_else(SecureHash::random),
		}
	}
}
