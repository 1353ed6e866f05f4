//! Static Address Allow-list Adapter
//!
//! Implements `AddressAllowlist` from an in-memory registry, built in code or
//! loaded from the published address book (JSON, chain id -> name -> address).

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::domain::{Address, ChainId};
use crate::ports::outbound::AddressAllowlist;

/// Address book could not be loaded.
#[derive(Debug, Error)]
pub enum AllowlistError {
    /// File could not be read.
    #[error("Failed to read address book {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// Document is not a valid address book.
    #[error("Malformed address book: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Address book layout: chain id -> contract name -> address.
type AddressBook = BTreeMap<ChainId, BTreeMap<String, Address>>;

/// Allow-list of known bridge contracts per chain.
///
/// Chains without an entry allow nothing.
#[derive(Clone, Debug, Default)]
pub struct StaticAllowlist {
    chains: HashMap<ChainId, HashSet<Address>>,
}

impl StaticAllowlist {
    /// Create an empty allow-list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add known addresses for a chain.
    pub fn with_chain<I, A>(mut self, chain_id: ChainId, addresses: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Address>,
    {
        self.chains
            .entry(chain_id)
            .or_default()
            .extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Parse an address book document.
    pub fn from_json_str(json: &str) -> Result<Self, AllowlistError> {
        let book: AddressBook = serde_json::from_str(json)?;
        let allowlist = book
            .into_iter()
            .fold(Self::new(), |list, (chain_id, contracts)| {
                list.with_chain(chain_id, contracts.into_values())
            });
        debug!(
            "[bridge-step] Loaded allow-list for {} chains",
            allowlist.chains.len()
        );
        Ok(allowlist)
    }

    /// Load an address book from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AllowlistError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AllowlistError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Known addresses on a chain.
    pub fn addresses(&self, chain_id: ChainId) -> impl Iterator<Item = &Address> {
        self.chains.get(&chain_id).into_iter().flatten()
    }
}

impl AddressAllowlist for StaticAllowlist {
    fn is_known(&self, chain_id: ChainId, address: &Address) -> bool {
        self.chains
            .get(&chain_id)
            .is_some_and(|known| known.contains(address))
    }
}
