//! Compare two Azure DevOps variable groups by the names of their variables.

pub mod azdo;
pub mod commands;
pub mod diff;
pub mod error;
pub mod report;
