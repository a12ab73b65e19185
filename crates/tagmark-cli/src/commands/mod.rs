//! Command handlers

pub mod bookmark;
pub mod config;
pub mod rules;
pub mod serve;
