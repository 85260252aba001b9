//! fundscreen: fundamentals screener for B3 equities and real-estate funds.
//!
//! Hexagonal architecture: pure transforms in [`domain`], port traits in
//! [`ports`], CSV/INI/snapshot implementations in [`adapters`], and the
//! command-line orchestration in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
