// folio-api: Async clients for the public APIs behind the landing-page widgets

pub mod error;
pub mod fetch;
pub mod github;
mod lenient;
pub mod open_meteo;
pub mod transport;

pub use error::Error;
pub use fetch::{CacheMode, JsonFetcher, RequestOptions};
pub use github::{GithubClient, Repository, UserProfile};
pub use open_meteo::{CurrentConditions, DailySummary, Forecast, ForecastQuery, OpenMeteoClient};
pub use transport::TransportConfig;
