//! Distribution algorithms

pub mod calculator;
pub mod schedule;

pub use calculator::{calculate, share_of};
pub use schedule::{is_due, next_distribution_time};
