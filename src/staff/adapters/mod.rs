//! Adapter implementations for staff ports.

pub mod memory;
pub mod postgres;
