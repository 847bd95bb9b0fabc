// lib.rs — Exposes internal modules for integration tests.
//
// The binary entry point lives in main.rs; this crate root re-exports the
// modules that tests/ need.

pub mod backend;
pub mod continuation;
pub mod directive;
pub mod document_model;
pub mod handlers;
pub mod hover;
pub mod instruction;
pub mod keywords;
pub mod markdown;
pub mod scanner;
pub mod state;
pub mod utf16;
pub mod variables;
