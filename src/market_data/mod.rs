pub mod bar;
pub mod file;
pub mod provider;
pub mod series;
pub mod yahoo;

pub use bar::Bar;
pub use file::FileProvider;
pub use provider::{BarRequest, MarketDataProvider};
pub use series::Series;
pub use yahoo::YahooChartProvider;
