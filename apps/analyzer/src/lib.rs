//! Resume / job-description analyzer: skill extraction and matching,
//! text similarity and optional AI recommendations behind an Axum API.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod extract;
pub mod llm_client;
pub mod preprocess;
pub mod recommendation;
pub mod routes;
pub mod similarity;
pub mod skill;
pub mod state;
