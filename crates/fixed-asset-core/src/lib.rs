pub mod asset;
pub mod depreciation;
pub mod error;
pub mod tax;
pub mod types;

#[cfg(feature = "reports")]
pub mod reports;

pub use error::FixedAssetError;
pub use types::*;

/// Standard result type for all fixed-asset operations
pub type FixedAssetResult<T> = Result<T, FixedAssetError>;
