pub mod application;
pub mod cleanup;
pub mod commands;
pub mod config;
pub mod error;
pub mod fetch;
pub mod package;
pub mod runtime;
