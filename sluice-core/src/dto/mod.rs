//! Data Transfer Objects for the control-plane API
//!
//! Request payloads and error bodies exchanged with the remote service.

pub mod error;
pub mod pipeline;
