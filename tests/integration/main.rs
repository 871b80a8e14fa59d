//! Integration tests against a mock HTTP server

mod evals_endpoints;
mod grader_endpoints;
