pub mod catalog;
pub mod clear;
pub mod config;
pub mod delete;
pub mod libraries;
pub mod login;
pub mod prompts;
pub mod scan;
pub mod scan_ui;
