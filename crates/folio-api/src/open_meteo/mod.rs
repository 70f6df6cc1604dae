// Open-Meteo forecast API surface

pub mod client;
pub mod models;

pub use client::{ForecastQuery, OpenMeteoClient};
pub use models::{CurrentConditions, DailySummary, Forecast};
