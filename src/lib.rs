//! Groundcrew: job and assignment tracking for a lawn-care crew.
//!
//! Directors schedule jobs and assign them to employees; employees start
//! and finish their jobs, attach photos, and leave notes. A daily reset
//! archives completed work and carries unfinished jobs into the new
//! business day.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage and alerts
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Orchestration over the ports
//!
//! # Modules
//!
//! - [`staff`]: Employees, roles, and capabilities
//! - [`job`]: Job lifecycle, photos, notes, and the dashboard
//! - [`assignment`]: One employee per job per day, with capacity rules
//! - [`reset`]: Daily archive and carry-forward sweep and its scheduler
//! - [`command`]: Text commands in, rendered replies out
//! - [`app`]: Service wiring for both storage backends

pub mod app;
pub mod assignment;
pub mod command;
pub mod config;
pub mod console;
pub mod db;
pub mod error;
pub mod job;
pub mod locks;
pub mod reset;
pub mod retry;
pub mod staff;
pub mod telemetry;
