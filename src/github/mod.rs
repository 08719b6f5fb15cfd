pub mod aggregate;
pub mod client;
pub mod models;
pub mod repo_path;
pub mod web;
