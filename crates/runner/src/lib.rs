//! HTTP clients for the runner plane.
//!
//! This crate owns every call that crosses the wire to the remote side:
//! - [`Provisioner`] asks the orchestrator for a fresh runner instance.
//! - [`Configurator`] pushes capability provider definitions into a runner.
//! - [`ToolClient`] forwards tool invocations and lists available tools.
//!
//! All clients are built once with bounded timeouts; a timed-out call is
//! reported as the corresponding failure, never retried here.

pub mod capability;
pub mod provision;
pub mod tools;

pub use capability::{
    capability_catalog, CapabilityCredentials, CapabilitySpec, ConfigReport, Configurator,
};
pub use provision::Provisioner;
pub use tools::ToolClient;
