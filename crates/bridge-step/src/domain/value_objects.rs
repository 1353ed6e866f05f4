//! # Domain Value Objects
//!
//! Immutable value types for route step execution.

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::errors::AmountParseError;

/// EVM chain identifier (Ethereum mainnet = 1, Polygon = 137, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Hex encoded account or contract address.
///
/// Kept exactly as received (EIP-55 checksum included). Equality, hashing
/// and ordering ignore ASCII case, so checksummed and plain spellings of the
/// same address compare equal.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Create an address from its hex string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// String form, as received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn key(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.key() {
            state.write_u8(byte);
        }
        state.write_u8(0xff);
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-chain transaction hash, kept exactly as the wallet reported it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Create a hash from its hex string.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TxHash {
    fn from(hash: &str) -> Self {
        Self(hash.to_string())
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unsigned 256-bit token amount.
///
/// Token amounts routinely exceed `u64`/`f64` precision, so the remote API
/// carries them as decimal strings; they are parsed straight into [`U256`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    /// Zero amount.
    pub fn zero() -> Self {
        Self(U256::zero())
    }

    /// Parse a base-10 amount string.
    pub fn from_dec_str(value: &str) -> Result<Self, AmountParseError> {
        U256::from_dec_str(value.trim())
            .map(Self)
            .map_err(|_| AmountParseError(value.to_string()))
    }

    /// Underlying integer.
    pub fn as_u256(&self) -> U256 {
        self.0
    }
}

impl FromStr for TokenAmount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dec_str(s)
    }
}

impl From<u128> for TokenAmount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for TokenAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_dec_str(&raw).map_err(serde::de::Error::custom)
    }
}

/// Category of a user transaction inside a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserTxType {
    /// Funds routed through the bridge's registry contracts.
    FundMovr,
    /// Same-chain swap on a DEX.
    DexSwap,
    /// Claim of bridged funds on the destination chain.
    Claim,
    /// Off-chain signature request.
    Sign,
}

impl UserTxType {
    /// Routed-funds transactions must target a known registry contract.
    pub fn is_routed_funds(&self) -> bool {
        matches!(self, Self::FundMovr)
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FundMovr => "fund-movr",
            Self::DexSwap => "dex-swap",
            Self::Claim => "claim",
            Self::Sign => "sign",
        }
    }
}

impl fmt::Display for UserTxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a route step as reported by the remote route service.
///
/// Only `Pending` keeps a step polling; every other value is terminal,
/// including values this client does not know about, which are kept
/// verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteStatus {
    /// Transaction seen, step not settled yet.
    Pending,
    /// Step settled successfully.
    Completed,
    /// Step failed on the provider side.
    Failed,
    /// Transaction reverted on chain.
    Reverted,
    /// Any other status value, as sent by the remote.
    Other(String),
}

impl RouteStatus {
    /// Whether polling should continue.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Whether the step is over.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Wire name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Reverted => "REVERTED",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for RouteStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            "REVERTED" => Self::Reverted,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for RouteStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RouteStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RouteStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Lifecycle of a transaction step.
///
/// `Unsubmitted -> Pending -> Done(status)`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    /// No hash recorded yet.
    #[default]
    Unsubmitted,
    /// Hash recorded, remote status still pending.
    Pending,
    /// Remote status reached a terminal value.
    Done(RouteStatus),
}

impl StepState {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: &StepState) -> bool {
        match (self, next) {
            (Self::Unsubmitted, Self::Pending) => true,
            (Self::Pending, Self::Done(status)) => status.is_terminal(),
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}
