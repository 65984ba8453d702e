//! Workout log core
//!
//! Calendar analytics over a hosted workout event log, plus an exercise
//! recommendation boundary. The presentation layer consumes the payload
//! assembled by [`dashboard::build_dashboard`] and renders it however it
//! likes; nothing else crosses that boundary.

pub mod cache;
pub mod calendar;
pub mod category;
pub mod dashboard;
pub mod exercises;
pub mod models;
pub mod store;

#[cfg(test)]
pub mod test_utils;
