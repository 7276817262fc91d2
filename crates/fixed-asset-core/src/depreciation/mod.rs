pub mod conventions;
pub mod methods;
pub mod schedule;

pub use conventions::{adjust_for_convention, Convention};
pub use methods::{depreciation_amount, DepreciationMethod};
pub use schedule::{build_schedule, YearRow};
