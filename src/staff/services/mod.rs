//! Application services for the staff directory.

mod directory;

pub use directory::{RegisterEmployeeRequest, StaffDirectory, StaffError, StaffResult};
