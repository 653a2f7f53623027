//! # optima-core
//!
//! Foundation types, errors, branded IDs, and utilities for Optima.
//!
//! This crate provides the shared vocabulary that all other Optima crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::UserId`], [`ids::DocumentId`], [`ids::ResetTokenId`] as newtypes
//! - **Messages**: [`messages::ChatMessage`] with system/user/assistant roles
//! - **Deltas**: [`events::DeltaEvent`] for streamed generation output
//! - **Errors**: [`errors::OptimaError`] hierarchy via `thiserror`, stable error codes
//! - **Retry**: [`retry::RetryConfig`] and backoff calculation
//! - **Text**: fence stripping and UTF-8-safe truncation helpers
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other optima crates.

#![deny(unsafe_code)]

pub mod errors;
pub mod events;
pub mod ids;
pub mod logging;
pub mod messages;
pub mod retry;
pub mod text;
