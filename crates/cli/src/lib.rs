//! Terminal helpers shared by Bitzy command-line tools
//!
//! - Status lines and headers
//! - Human-readable distances, counts and durations
//! - Spinners for network-bound work

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod output;
pub mod progress;

pub use output::{format_count, format_distance, yes_no, Status};
