pub mod basis;

#[cfg(feature = "form4562")]
pub mod form4562;

pub use basis::adjusted_basis;
