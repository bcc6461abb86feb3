//! # Transactional Core
//!
//! The ledger engine: registration, enrollment, exchange, and history
//! queries over the storage port.
//!
//! ## Transaction discipline
//!
//! Every operation validates its arguments, performs all reads and
//! invariant checks, buffers its writes in one [`WriteBatch`], and commits
//! exactly once. The store applies a batch all-or-nothing, so a reader can
//! never observe an asset without its history entry, or a seller debited
//! without the buyer credited.
//!
//! ## Ownership invariant
//!
//! For each asset there is exactly one current owner - the
//! `current_owner_id` of its most recent history record - and only that
//! user's `assets` sequence contains the asset id. Enrollment and exchange
//! are the only writers and both preserve this.

use crate::domain::{
    keys, Asset, HistoryRecord, HistoryScope, LedgerConfig, LedgerError, User,
    ORIGIN_OWNER_SENTINEL,
};
use crate::ports::{StateScan, StateStore, WriteBatch};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The provenance ledger over a storage collaborator.
///
/// Holds no state of its own beyond configuration; all records live in the
/// injected store, and each method is one synchronous transaction.
pub struct Ledger<S: StateStore> {
    store: S,
    config: LedgerConfig,
}

impl<S: StateStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, LedgerConfig::default())
    }

    pub fn with_config(store: S, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// The underlying store, for hosts that own the ledger directly.
    pub fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // ENTITY STORE
    // =========================================================================

    /// Register a new user. One-time per id; users are never deleted.
    pub fn register_user(&self, name: &str, id: &str) -> Result<(), LedgerError> {
        if name.is_empty() || id.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "user name and id must be non-empty".to_string(),
            ));
        }
        // The sentinel is reserved for enrollment records; admitting it as a
        // user id would make an enrollment indistinguishable from a transfer.
        if id == ORIGIN_OWNER_SENTINEL {
            return Err(LedgerError::InvalidArgument(format!(
                "user id {id:?} is reserved"
            )));
        }

        let key = keys::user_key(id)?;
        if self.store.get(&key)?.is_some() {
            return Err(LedgerError::UserAlreadyExists { id: id.to_string() });
        }

        let mut batch = WriteBatch::new();
        batch.put(key, encode(&User::new(name, id))?);
        self.store.commit(batch)?;

        log::debug!("registered user {id}");
        Ok(())
    }

    /// Look up a user record.
    pub fn get_user(&self, id: &str) -> Result<User, LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "user id must be non-empty".to_string(),
            ));
        }
        self.read_user(&keys::user_key(id)?, id)
    }

    /// Enroll a new asset under an existing owner.
    ///
    /// Writes the asset record, the updated owner, and the sentinel-origin
    /// history record in one commit, and returns that history record.
    pub fn enroll_asset(
        &self,
        name: &str,
        id: &str,
        metadata: &str,
        owner_id: &str,
    ) -> Result<HistoryRecord, LedgerError> {
        if name.is_empty() || id.is_empty() || owner_id.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "asset name, id and owner id must be non-empty".to_string(),
            ));
        }

        let owner_key = keys::user_key(owner_id)?;
        let mut owner = self.read_user(&owner_key, owner_id)?;

        let asset_key = keys::asset_key(id)?;
        if self.store.get(&asset_key)?.is_some() {
            return Err(LedgerError::AssetAlreadyExists { id: id.to_string() });
        }

        self.push_asset(&mut owner, id)?;
        let asset = Asset {
            name: name.to_string(),
            id: id.to_string(),
            metadata: metadata.to_string(),
        };
        let record = HistoryRecord::enrollment(id, owner_id);
        let history_key = keys::history_key(id, ORIGIN_OWNER_SENTINEL, owner_id)?;

        let mut batch = WriteBatch::new();
        batch.put(asset_key, encode(&asset)?);
        batch.put(owner_key, encode(&owner)?);
        batch.put(history_key, encode(&record)?);
        self.store.commit(batch)?;

        log::debug!("enrolled asset {id} under user {owner_id}");
        Ok(record)
    }

    /// Look up an asset record.
    pub fn get_asset(&self, id: &str) -> Result<Asset, LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "asset id must be non-empty".to_string(),
            ));
        }
        self.read_asset(&keys::asset_key(id)?, id)
    }

    // =========================================================================
    // EXCHANGE ENGINE
    // =========================================================================

    /// Transfer an asset from its recorded holder to another user.
    ///
    /// Only the recorded current holder may be the source; anyone else is
    /// rejected before any write is buffered. The asset's own record is
    /// untouched. Not idempotent: a repeat of a completed exchange fails
    /// the holder check, by design.
    ///
    /// History keys carry no sequence component, so a transfer that repeats
    /// an earlier `(asset, seller, buyer)` triple writes the identical
    /// record to the identical key; the lineage keeps one entry per
    /// distinct triple.
    pub fn exchange(
        &self,
        seller_id: &str,
        asset_id: &str,
        buyer_id: &str,
    ) -> Result<(), LedgerError> {
        if seller_id.is_empty() || asset_id.is_empty() || buyer_id.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "seller id, asset id and buyer id must be non-empty".to_string(),
            ));
        }

        let seller_key = keys::user_key(seller_id)?;
        let buyer_key = keys::user_key(buyer_id)?;

        let mut seller = self.read_user(&seller_key, seller_id)?;
        // A self-exchange works on the one record; loading it twice would
        // make the second write clobber the first.
        let buyer = if seller_id == buyer_id {
            None
        } else {
            Some(self.read_user(&buyer_key, buyer_id)?)
        };
        // Existence check only; the record itself is never rewritten.
        self.read_asset(&keys::asset_key(asset_id)?, asset_id)?;

        let removed = remove_asset(&mut seller.assets, asset_id);
        if removed == 0 {
            return Err(LedgerError::SellerDoesNotHoldAsset {
                user_id: seller_id.to_string(),
                asset_id: asset_id.to_string(),
            });
        }
        if removed > 1 {
            // The sequence is supposed to be duplicate-free; keep none of
            // the stale entries rather than leaving a phantom holder.
            log::warn!(
                "user {seller_id} held {removed} entries for asset {asset_id}; removed all"
            );
        }

        let record = HistoryRecord::transfer(asset_id, seller_id, buyer_id);
        let history_key = keys::history_key(asset_id, seller_id, buyer_id)?;

        let mut batch = WriteBatch::new();
        match buyer {
            Some(mut buyer) => {
                self.push_asset(&mut buyer, asset_id)?;
                batch.put(seller_key, encode(&seller)?);
                batch.put(buyer_key, encode(&buyer)?);
            }
            None => {
                self.push_asset(&mut seller, asset_id)?;
                batch.put(seller_key, encode(&seller)?);
            }
        }
        batch.put(history_key, encode(&record)?);
        self.store.commit(batch)?;

        log::debug!("exchanged asset {asset_id}: {seller_id} -> {buyer_id}");
        Ok(())
    }

    // =========================================================================
    // HISTORY INDEX
    // =========================================================================

    /// Reconstruct an asset's lineage at the requested granularity.
    ///
    /// Records come back in composite-key order: ascending by origin owner,
    /// then current owner, within the asset's prefix. With the documented
    /// sentinel, the enrollment record sorts first for alphanumeric ids;
    /// the order carries no chronology beyond that.
    pub fn asset_history(
        &self,
        asset_id: &str,
        scope: HistoryScope,
    ) -> Result<Vec<HistoryRecord>, LedgerError> {
        if asset_id.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "asset id must be non-empty".to_string(),
            ));
        }
        // An empty scan cannot distinguish "never enrolled" from "no
        // records"; the asset record is the existence authority.
        self.read_asset(&keys::asset_key(asset_id)?, asset_id)?;

        let prefix = match scope {
            HistoryScope::EnrollOnly => {
                keys::history_origin_prefix(asset_id, ORIGIN_OWNER_SENTINEL)?
            }
            HistoryScope::All | HistoryScope::ExchangeOnly => keys::history_prefix(asset_id)?,
        };

        let mut scan = self.store.scan_prefix(&prefix)?;
        let drained = drain_history(scan.as_mut(), scope);
        let closed = scan.close();
        let records = drained?;
        closed?;
        Ok(records)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn read_user(&self, key: &[u8], id: &str) -> Result<User, LedgerError> {
        match self.store.get(key)? {
            Some(bytes) => decode(&bytes, "user record"),
            None => Err(LedgerError::UserNotFound { id: id.to_string() }),
        }
    }

    fn read_asset(&self, key: &[u8], id: &str) -> Result<Asset, LedgerError> {
        match self.store.get(key)? {
            Some(bytes) => decode(&bytes, "asset record"),
            None => Err(LedgerError::AssetNotFound { id: id.to_string() }),
        }
    }

    fn push_asset(&self, user: &mut User, asset_id: &str) -> Result<(), LedgerError> {
        if user.assets.len() >= self.config.max_assets_per_user {
            return Err(LedgerError::AssetLimitReached {
                user_id: user.id.clone(),
                limit: self.config.max_assets_per_user,
            });
        }
        user.assets.push(asset_id.to_string());
        Ok(())
    }
}

/// Drain a history scan, decoding and scope-filtering each record.
///
/// Kept free of the cursor's ownership so the caller can close it on the
/// decode-failure path as well as the happy one.
fn drain_history(
    scan: &mut dyn StateScan,
    scope: HistoryScope,
) -> Result<Vec<HistoryRecord>, LedgerError> {
    let mut records = Vec::new();
    while let Some((_key, value)) = scan.next_entry()? {
        let record: HistoryRecord = decode(&value, "history record")?;
        if scope == HistoryScope::ExchangeOnly && record.is_enrollment() {
            continue;
        }
        records.push(record);
    }
    Ok(records)
}

/// Remove every occurrence of `asset_id`, returning how many were present.
fn remove_asset(assets: &mut Vec<String>, asset_id: &str) -> usize {
    let before = assets.len();
    assets.retain(|held| held != asset_id);
    before - assets.len()
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(value).map_err(|err| LedgerError::Serialization(err.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8], context: &'static str) -> Result<T, LedgerError> {
    serde_json::from_slice(bytes).map_err(|err| LedgerError::Corrupt {
        context,
        detail: err.to_string(),
    })
}
