//! Shared test utilities for the layerbind workspace.
//!
//! This crate provides directory-tree fixtures for loader and binder tests.
//! It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`tree`]: [`tree::TestTree`] builder for nested configuration directories

pub mod tree;
