//! Port traits: the seams between the transforms and their collaborators.

pub mod config_port;
pub mod report_port;
pub mod table_port;
