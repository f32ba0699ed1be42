//! Request middleware.
//!
//! Purpose: request lifecycle concerns such as trace correlation that sit
//! outside individual handlers.

pub mod trace;

pub use trace::Trace;
