//! # pmo-core
//!
//! Core types, ID generation, and error types for the PMO document pipeline.
//!
//! This crate provides the foundational types shared across all PMO crates:
//! - Entity structs for ingested documents, chunks, and email bookkeeping rows
//! - Document format enum with extension detection
//! - ID prefix constants and random ID generation
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
