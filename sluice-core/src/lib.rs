//! Sluice Core
//!
//! Core types and abstractions for provisioning pipelines on a remote
//! control plane.
//!
//! This crate contains:
//! - Domain types: compilation profiles, runtime configuration and the
//!   pipeline descriptor returned by the service
//! - DTOs: the pipeline definition payload and the service's error body
//!
//! Nothing in here performs I/O; the HTTP transport lives in `sluice-client`.

pub mod domain;
pub mod dto;
