//! Integration tests for the Tidbit snippet generation service

mod catalog_store;
mod cli_routes;
mod config_integration;
mod feedback;
mod parser_scenarios;
mod pass_isolation;
