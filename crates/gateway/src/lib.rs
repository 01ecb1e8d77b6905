//! # VESTA Gateway
//!
//! The outbound boundary: one controller-bound HTTP request per resolved
//! command, with a closed failure-kind enumeration. Retry policy lives with
//! callers, never here, so a transient failure can't double-actuate.

mod controller;

pub use controller::{ControllerClient, Dispatch};
