//! GitHub repository search with relevance ranking and an in-process
//! favorites list, served over HTTP.

pub mod api;
pub mod cli;
pub mod error;
pub mod favorites;
pub mod github;
pub mod health;
pub mod models;
pub mod relevance;
pub mod service;
pub mod types;
