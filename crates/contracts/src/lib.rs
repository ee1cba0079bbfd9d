//! Shared types between the important events frontend and backend.
//!
//! Everything here compiles for the host and for `wasm32`, so the pure
//! form logic lives here and is exercised by both sides.

pub mod usecases;
