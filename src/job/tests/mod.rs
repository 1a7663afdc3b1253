//! Unit tests for the job context.
