//! Core domain types and transforms.

pub mod config;
pub mod config_validation;
pub mod equity;
pub mod error;
pub mod fund;
pub mod gordon;
pub mod graham;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod screener;
pub mod table;
