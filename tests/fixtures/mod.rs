//! Test fixtures for resupply-planner.
//!
//! Provides realistic test data including:
//! - A densified US-95 track across the Nevada desert
//! - Fuel stations along (and off) that track
//! - Seeded POI scatter around the track for property checks

#![allow(dead_code)]

pub mod us95_corridor;

pub use us95_corridor::*;
