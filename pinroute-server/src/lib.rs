//! Pin routing server.
//!
//! A web application for a map pin tool: resolve places to coordinates,
//! compare routes between two places across travel modes, and route
//! through a saved list of pins.

pub mod cache;
pub mod config;
pub mod domain;
pub mod google;
pub mod logging;
pub mod resolve;
pub mod routing;
pub mod store;
pub mod web;
