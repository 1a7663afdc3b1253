//! Adapter implementations for reset ports.

pub mod log;
pub mod memory;
pub mod postgres;
