//! # ledger-engine
//!
//! Transactional ownership/provenance ledger over an abstract key-value
//! storage port.
//!
//! ## Role in System
//!
//! - **Entity Store**: registration of users and one-time enrollment of
//!   assets, as single committed transactions
//! - **Exchange Engine**: ownership transfer - seller debit, buyer credit,
//!   history append, committed atomically
//! - **History Index**: append-only provenance records under composite
//!   keys, reconstructed by prefix scan at three granularities
//!
//! The host transaction-invocation layer calls [`api::InvocationHandler`]
//! with an operation name and ordered string arguments; the engine talks
//! to durable storage only through [`ports::StateStore`].
//!
//! ```
//! use ledger_engine::adapters::InMemoryStateStore;
//! use ledger_engine::domain::{HistoryScope, Ledger};
//!
//! let ledger = Ledger::new(InMemoryStateStore::new());
//! ledger.register_user("Alice", "alice").unwrap();
//! ledger.register_user("Bob", "bob").unwrap();
//! ledger.enroll_asset("Painting", "a1", "oil on canvas", "alice").unwrap();
//! ledger.exchange("alice", "a1", "bob").unwrap();
//!
//! let lineage = ledger.asset_history("a1", HistoryScope::All).unwrap();
//! assert_eq!(lineage.len(), 2);
//! ```

pub mod adapters;
pub mod api;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use api::*;
pub use domain::*;
pub use ports::*;
