//! Unit tests for the assignment context.

mod coordinator_tests;
