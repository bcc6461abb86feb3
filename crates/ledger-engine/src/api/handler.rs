//! # Invocation Handler
//!
//! The named-operation surface the host transaction-invocation layer calls
//! into: an operation name plus an ordered sequence of string arguments in,
//! serialized payload bytes or a [`LedgerError`] out.
//!
//! Argument-count mismatches and unknown operation or scope names are
//! rejected here, before the ledger - and therefore the store - is touched.
//! Everything else is delegated and surfaced unchanged.
//!
//! ## Operations
//!
//! | operation          | args                        | payload              |
//! |--------------------|-----------------------------|----------------------|
//! | registerUser       | name, id                    | empty                |
//! | enrollAsset        | name, id, metadata, ownerId | HistoryRecord        |
//! | exchange           | sellerId, assetId, buyerId  | empty                |
//! | queryUser          | id                          | User                 |
//! | queryAsset         | id                          | Asset                |
//! | queryAssetHistory  | assetId, [scope]            | Vec\<HistoryRecord\> |
//!
//! Scope strings are `"all"` (default), `"enroll"`, `"exchange"`.

use crate::domain::{HistoryScope, Ledger, LedgerError};
use crate::ports::StateStore;
use serde::Serialize;

/// Dispatches named operations onto a [`Ledger`].
pub struct InvocationHandler<S: StateStore> {
    ledger: Ledger<S>,
}

impl<S: StateStore> InvocationHandler<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self { ledger }
    }

    /// Direct access to the ledger, for hosts that own the handler.
    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    /// Execute one named operation.
    ///
    /// Mutating operations return an empty payload except `enrollAsset`,
    /// which echoes the enrollment history record; queries return the
    /// serialized record(s).
    pub fn invoke(&self, operation: &str, args: &[String]) -> Result<Vec<u8>, LedgerError> {
        match operation {
            "registerUser" => {
                let [name, id] = expect_args(operation, args)?;
                self.ledger.register_user(name, id)?;
                Ok(Vec::new())
            }
            "enrollAsset" => {
                let [name, id, metadata, owner_id] = expect_args(operation, args)?;
                let record = self.ledger.enroll_asset(name, id, metadata, owner_id)?;
                to_payload(&record)
            }
            "exchange" => {
                let [seller_id, asset_id, buyer_id] = expect_args(operation, args)?;
                self.ledger.exchange(seller_id, asset_id, buyer_id)?;
                Ok(Vec::new())
            }
            "queryUser" => {
                let [id] = expect_args(operation, args)?;
                to_payload(&self.ledger.get_user(id)?)
            }
            "queryAsset" => {
                let [id] = expect_args(operation, args)?;
                to_payload(&self.ledger.get_asset(id)?)
            }
            "queryAssetHistory" => {
                if args.is_empty() || args.len() > 2 {
                    return Err(LedgerError::InvalidArgument(format!(
                        "{operation} expects 1 or 2 arguments, got {}",
                        args.len()
                    )));
                }
                let scope = match args.get(1) {
                    Some(raw) => HistoryScope::parse(raw).ok_or_else(|| {
                        LedgerError::InvalidArgument(format!("unknown history scope: {raw:?}"))
                    })?,
                    None => HistoryScope::All,
                };
                to_payload(&self.ledger.asset_history(&args[0], scope)?)
            }
            _ => Err(LedgerError::InvalidArgument(format!(
                "unknown operation: {operation:?}"
            ))),
        }
    }
}

fn expect_args<'a, const N: usize>(
    operation: &str,
    args: &'a [String],
) -> Result<[&'a str; N], LedgerError> {
    if args.len() != N {
        return Err(LedgerError::InvalidArgument(format!(
            "{operation} expects {N} arguments, got {}",
            args.len()
        )));
    }
    let mut out = [""; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.as_str();
    }
    Ok(out)
}

fn to_payload<T: Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(value).map_err(|err| LedgerError::Serialization(err.to_string()))
}
