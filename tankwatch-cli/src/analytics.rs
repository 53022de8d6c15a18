//! Refill-aware consumption analytics over tank-level telemetry.
//!
//! Everything in here is pure computation: degraded inputs produce `None`s, never errors.

mod config;
mod consumption;
mod daily;
mod forecast;
mod profile;
mod refill;
mod regression;
mod trend;

pub use self::{
    config::AnalysisConfig,
    consumption::ConsumptionRate,
    daily::{DailyConsumption, daily_breakdown},
    forecast::Forecast,
    profile::ConsumptionProfile,
    refill::RefillSplit,
    trend::{Trend, TrendClassifier},
};
