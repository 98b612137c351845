pub mod align;
pub mod app;
pub mod chart;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod domain;
pub mod ecdc;
pub mod error;
pub mod output;
pub mod present;
pub mod store;
