//! UK take-home pay engine.
//!
//! This crate computes take-home pay from a gross annual salary by applying
//! marginal-rate bands for income tax and National Insurance, tapering the
//! personal allowance for high earners, and layering pension and student
//! loan deductions on the correct base.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
