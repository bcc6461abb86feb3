//! # Domain Entities
//!
//! Core records of the provenance ledger.
//!
//! ## Type Decisions
//!
//! - Identifiers are `String` - the ledger is identifier-agnostic and stores
//!   whatever the host hands it, as long as it is non-empty and NUL-free
//!   (see `keys`). No id format is imposed here.
//! - `User::assets` is a `Vec<String>` kept duplicate-free by the engine.
//!   Membership checks are linear; `LedgerConfig::max_assets_per_user`
//!   bounds the sequence so the scan cost stays flat.

use serde::{Deserialize, Serialize};

/// Reserved origin-owner id marking an enrollment record ("no prior holder").
///
/// `'!'` is byte 0x21 and sorts below every ASCII alphanumeric byte, so for
/// conventionally named owner ids the enrollment record is the first entry
/// of a full history scan. The value can never collide with a real user:
/// registration rejects it as a user id.
pub const ORIGIN_OWNER_SENTINEL: &str = "!origin";

/// An asset holder.
///
/// Created by registration and never deleted. `assets` lists the ids of
/// every asset for which this user is the last recorded current owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub id: String,
    pub assets: Vec<String>,
}

impl User {
    /// A freshly registered user holds nothing.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            assets: Vec::new(),
        }
    }

    /// Whether this user is the recorded holder of `asset_id`.
    pub fn holds(&self, asset_id: &str) -> bool {
        self.assets.iter().any(|held| held == asset_id)
    }
}

/// A registered item of value.
///
/// Immutable after enrollment: exchanges never touch this record, only the
/// holders' `assets` sequences and the history index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub id: String,
    pub metadata: String,
}

/// One immutable ownership fact: the asset moved from `origin_owner_id`
/// to `current_owner_id`. Append-only; never revised.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub asset_id: String,
    pub origin_owner_id: String,
    pub current_owner_id: String,
}

impl HistoryRecord {
    /// The first record of an asset's lineage, written at enrollment.
    pub fn enrollment(asset_id: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            origin_owner_id: ORIGIN_OWNER_SENTINEL.to_string(),
            current_owner_id: owner_id.into(),
        }
    }

    /// A record written by a completed exchange.
    pub fn transfer(
        asset_id: impl Into<String>,
        seller_id: impl Into<String>,
        buyer_id: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            origin_owner_id: seller_id.into(),
            current_owner_id: buyer_id.into(),
        }
    }

    /// True for the sentinel-origin enrollment record.
    pub fn is_enrollment(&self) -> bool {
        self.origin_owner_id == ORIGIN_OWNER_SENTINEL
    }
}

/// Granularity of a history query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryScope {
    /// Every record of the asset, in composite-key order.
    All,
    /// Only the sentinel-origin enrollment record (at most one).
    EnrollOnly,
    /// Every record except the enrollment one, scan order preserved.
    ExchangeOnly,
}

impl HistoryScope {
    /// Parse the wire form used by `queryAssetHistory`. Case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "enroll" => Some(Self::EnrollOnly),
            "exchange" => Some(Self::ExchangeOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::EnrollOnly => "enroll",
            Self::ExchangeOnly => "exchange",
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct LedgerConfig {
    /// Maximum entries in one user's `assets` sequence.
    /// Bounds the linear membership scan and per-record size.
    pub max_assets_per_user: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_assets_per_user: 10_000,
        }
    }
}
