//! Test utilities and helpers for the widecol crates.
//!
//! This crate provides:
//! - Row key and column generators for synthetic series
//! - JSON datasets describing the content of a store
//! - A store wrapper injecting request failures
//!
//! # Usage
//!
//! This crate is intended for use within the widecol test suites.

pub mod data_gen;
pub mod dataset;
pub mod faulty_store;

pub use faulty_store::FaultyStore;
