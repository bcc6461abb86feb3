//! # Storage Key Construction
//!
//! Deterministic, collision-free mapping from logical ids to byte-string
//! storage keys, in three disjoint namespaces:
//!
//! - user records:  `user_<id>`
//! - asset records: `asset_<id>`
//! - history records: `0x00 history 0x00 <asset> 0x00 <origin> 0x00 <current> 0x00`
//!
//! The leading NUL keeps every composite key outside the plain-record
//! namespaces; the trailing NUL after each component makes the encoding
//! injective and turns every sub-tuple into an exact byte prefix of the
//! full key. A scan over `history_prefix(asset)` therefore yields all
//! history of that asset, and `history_origin_prefix(asset, origin)`
//! narrows it to one origin, with no secondary index.
//!
//! Components must be non-empty and NUL-free; anything else is rejected
//! with `InvalidKeyComponent` before a key is formed.

use crate::domain::LedgerError;

const USER_PREFIX: &str = "user_";
const ASSET_PREFIX: &str = "asset_";
const HISTORY_NAMESPACE: &str = "history";
const DELIMITER: u8 = 0x00;

/// Key of a user record.
pub fn user_key(user_id: &str) -> Result<Vec<u8>, LedgerError> {
    let user_id = validated(user_id)?;
    let mut key = Vec::with_capacity(USER_PREFIX.len() + user_id.len());
    key.extend_from_slice(USER_PREFIX.as_bytes());
    key.extend_from_slice(user_id.as_bytes());
    Ok(key)
}

/// Key of an asset record.
pub fn asset_key(asset_id: &str) -> Result<Vec<u8>, LedgerError> {
    let asset_id = validated(asset_id)?;
    let mut key = Vec::with_capacity(ASSET_PREFIX.len() + asset_id.len());
    key.extend_from_slice(ASSET_PREFIX.as_bytes());
    key.extend_from_slice(asset_id.as_bytes());
    Ok(key)
}

/// Full composite key of one history record.
pub fn history_key(
    asset_id: &str,
    origin_owner_id: &str,
    current_owner_id: &str,
) -> Result<Vec<u8>, LedgerError> {
    composite(&[asset_id, origin_owner_id, current_owner_id])
}

/// Prefix shared by every history key of `asset_id`.
pub fn history_prefix(asset_id: &str) -> Result<Vec<u8>, LedgerError> {
    composite(&[asset_id])
}

/// Prefix shared by the history keys of one `(asset, origin)` pair.
pub fn history_origin_prefix(
    asset_id: &str,
    origin_owner_id: &str,
) -> Result<Vec<u8>, LedgerError> {
    composite(&[asset_id, origin_owner_id])
}

fn composite(components: &[&str]) -> Result<Vec<u8>, LedgerError> {
    let mut key = Vec::with_capacity(
        2 + HISTORY_NAMESPACE.len() + components.iter().map(|c| c.len() + 1).sum::<usize>(),
    );
    key.push(DELIMITER);
    key.extend_from_slice(HISTORY_NAMESPACE.as_bytes());
    key.push(DELIMITER);
    for component in components {
        key.extend_from_slice(validated(component)?.as_bytes());
        key.push(DELIMITER);
    }
    Ok(key)
}

fn validated(component: &str) -> Result<&str, LedgerError> {
    if component.is_empty() {
        return Err(LedgerError::InvalidKeyComponent(
            "empty key component".to_string(),
        ));
    }
    if component.bytes().any(|b| b == DELIMITER) {
        return Err(LedgerError::InvalidKeyComponent(format!(
            "key component {component:?} contains a NUL byte"
        )));
    }
    Ok(component)
}
