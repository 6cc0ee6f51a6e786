///! Command handlers

pub mod compute;
pub mod config;
pub mod diff;
pub mod interfaces;
