//! Unit tests for the reset context.
