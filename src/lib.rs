//! Shift Scheduling
//!
//! Assigns staff to daily open / middle / close shifts over a date range.
//! Generation is a greedy score-fill: each day fixes half-day requests, covers
//! the open and close floors, then fills up to the day's target headcount.
//! Every result is re-checked against hard constraints before it may be saved
//! or exported.
//!
//! ```
//! use shift_scheduling::demo_data::{self, DemoData};
//! use shift_scheduling::planner::plan;
//! use shift_scheduling::scoring::RandomTieBreak;
//!
//! let input = demo_data::generate(DemoData::Small);
//! let schedule = plan(&input, &mut RandomTieBreak::seeded(0)).unwrap();
//! assert_eq!(schedule.assignments.len(), 28);
//! ```

pub mod api;
pub mod calendar;
pub mod config;
pub mod console;
pub mod constraints;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod engine;
pub mod export;
pub mod planner;
pub mod scoring;
pub mod stats;
pub mod store;
pub mod validation;
