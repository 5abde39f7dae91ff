//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Fetching current weather for a coordinate (`provider`)
//! - A single-slot cache of the last good report (`cache`)
//! - Pure display formatting (`format`) and the view model (`model`)
//! - The orchestration tying them together (`pipeline`)
//! - Configuration & credentials handling (`config`)
//!
//! Location acquisition, permission prompts and network probing belong to the
//! host; it hands in a [`Coordinate`] and a network-availability flag and gets
//! back a [`ViewModel`] or a [`RefreshFailure`].

pub mod cache;
pub mod config;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod provider;

pub use cache::{FileStore, MemoryStore, SlotStore, WeatherCache};
pub use config::Config;
pub use format::{LogicalIcon, format_time, resolve_icon, unit_for};
pub use model::{
    Coordinate, CoordinateError, MainMetrics, SystemInfo, ViewModel, WeatherCondition,
    WeatherReport, Wind,
};
pub use pipeline::{LocaleSource, PipelineOutcome, PipelineState, RefreshFailure, WeatherPipeline};
pub use provider::{FetchError, WeatherClient, openweather::OpenWeatherClient};
