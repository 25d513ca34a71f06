//! flowgate - Versioned workflow lifecycle API over pluggable engines
//!
//! Exposes start, get, raise-event, pause, resume, terminate and purge for
//! workflow instances. Each call names the workflow engine component that
//! should serve it; the API validates the request, waits until the engine
//! subsystem is ready, dispatches to the component and normalizes whatever
//! it returns into a stable set of responses and errors.
//!
//! # Modules
//!
//! - `adapters`: Workflow engine capability and the bundled engines
//! - `core`: Validation, component resolution, dispatch and error taxonomy
//! - `domain`: Request, response and workflow state types
//! - `config`: Component configuration
//! - `cli`: Command-line interface
//!
//! # API vintages
//!
//! Every operation exists as `*_beta1` and `*_alpha1`. The alpha1 entry
//! points forward to beta1, so both behave identically.
//!
//! # Usage
//!
//! ```bash
//! # Start a workflow
//! flowgate start checkout --instance-id order-1 --input '{"amount": 12}'
//!
//! # Check its state
//! flowgate get order-1
//!
//! # Deliver an event
//! flowgate raise-event order-1 approved --data '{"by": "ops"}'
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;

// Re-export main types at crate root for convenience
pub use adapters::{EngineError, FileEngine, MemoryEngine, WorkflowComponent};
pub use core::{ApiError, ApiVersion, ComponentRegistry, ReadySignal, WorkflowApi};
