//! Integration tests for request_log
//!
//! Each test starts the HTTP host in-process on an ephemeral port with a
//! recording sink and drives it over real HTTP with reqwest.
//!
//! Run with: cargo test --test integration

mod helpers;

mod access_log;
mod http_basic;
