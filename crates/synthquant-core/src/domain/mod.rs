mod frequency;
mod region;
mod series;
mod symbol;
mod timestamp;

pub use frequency::Frequency;
pub use region::Region;
pub use series::{AssetSeries, PricePoint};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
