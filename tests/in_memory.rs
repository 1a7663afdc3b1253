//! In-memory integration tests for the assembled application.
//!
//! Tests are organized into modules by functionality:
//! - `crew_day_tests`: Job lifecycle, assignment, roster, and reset flows
//!   driven through text commands
//! - `console_tests`: Line-oriented console transport

mod test_helpers;

mod in_memory {
    mod console_tests;
    mod crew_day_tests;
}
