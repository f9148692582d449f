//! reposummary: turn a GitHub repository into a single LLM-ready text file.
//!
//! The pipeline pulls the recursive tree listing through [`github::RepoHost`],
//! filters candidate files by extension and directory ([`filter`]), fetches
//! and truncates blob contents with bounded concurrency ([`fetch`]), and
//! assembles the delimited document plus tree outline ([`summary`]).
//! [`run`] ties the phases together behind an explicit request/outcome API.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod github;
pub mod run;
pub mod summary;
pub mod trace;
