//! Batch driver for the blunder analysis core.
//!
//! Collects move-text blobs from files, analyzes them across worker threads
//! and writes one JSON line per game. A game that fails to analyze is logged,
//! counted and skipped; it never stops the batch.

pub mod batch;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
