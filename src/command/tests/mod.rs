//! Unit tests for command parsing and dispatch.
