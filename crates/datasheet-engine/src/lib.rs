//! datasheet_engine - Cell model, aggregate expressions and value formatting.

pub mod engine;
