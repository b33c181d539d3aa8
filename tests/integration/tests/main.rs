//! End-to-end pipeline tests.
//!
//! These drive the full authorization response pipeline against an in-process
//! stub provider serving a real token endpoint over HTTP.

mod common;
mod pipeline;
