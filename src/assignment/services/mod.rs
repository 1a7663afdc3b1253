//! Application services for daily assignments.

mod coordinator;

pub use coordinator::{
    AssignmentCoordinator, AssignmentError, AssignmentResult, CarryOutcome,
};
