//! Integration tests for ritmm-bot.
//!
//! These drive the executor and the round loop against an in-memory
//! gateway that records every call.

pub mod common;
