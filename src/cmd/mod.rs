//! Command module structure for labqc CLI

pub mod classify;
pub mod config;
pub mod run;
pub mod util;
