//! studypulse-core: scoring, profiling, and recommendation engine.
//!
//! This crate defines the attempt data model, the aggregation engine that
//! reduces raw attempts into metric tables, the classifier that turns those
//! metrics into leveled student profiles, and the rule-based recommendation
//! engine that turns weak topics into prioritized study advice.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod profile;
pub mod recommend;
