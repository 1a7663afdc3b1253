//! In-memory staff adapters.

mod employee;

pub use employee::InMemoryEmployeeRepository;
