//! Unit tests for the staff context.

mod domain_tests;
