mod fixture;
mod yahoo;

pub use fixture::FixtureHistorySource;
pub use yahoo::YahooHistorySource;
