use thiserror::Error;

/// Failure taxonomy for ledger operations.
///
/// Every operation returns these as structured results; nothing panics
/// across the operation boundary and a failed operation leaves no partial
/// state behind. [`LedgerError::code`] collapses the variants into the
/// five-way category the host layer maps onto its own status scheme.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("user not found: {id}")]
    UserNotFound { id: String },

    #[error("asset not found: {id}")]
    AssetNotFound { id: String },

    #[error("user already exists: {id}")]
    UserAlreadyExists { id: String },

    #[error("asset already exists: {id}")]
    AssetAlreadyExists { id: String },

    #[error("user {user_id} does not currently hold asset {asset_id}")]
    SellerDoesNotHoldAsset { user_id: String, asset_id: String },

    #[error("user {user_id} already holds the maximum of {limit} assets")]
    AssetLimitReached { user_id: String, limit: usize },

    #[error("malformed key component: {0}")]
    InvalidKeyComponent(String),

    #[error("stored {context} does not decode: {detail}")]
    Corrupt {
        context: &'static str,
        detail: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Category of a [`LedgerError`], for hosts that speak in status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    PreconditionFailed,
    StoreFailure,
}

impl LedgerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) | Self::InvalidKeyComponent(_) => ErrorCode::InvalidArgument,
            Self::UserNotFound { .. } | Self::AssetNotFound { .. } => ErrorCode::NotFound,
            Self::UserAlreadyExists { .. } | Self::AssetAlreadyExists { .. } => {
                ErrorCode::AlreadyExists
            }
            Self::SellerDoesNotHoldAsset { .. } | Self::AssetLimitReached { .. } => {
                ErrorCode::PreconditionFailed
            }
            Self::Corrupt { .. }
            | Self::Serialization(_)
            | Self::LockPoisoned
            | Self::StorageError(_) => ErrorCode::StoreFailure,
        }
    }
}
