//! Inbound text commands.
//!
//! [`services::CommandDispatcher`] is the request boundary: it resolves the
//! caller, parses the text into a [`domain::Command`], calls the job and
//! assignment services, and renders a [`domain::Reply`]. Every error kind
//! becomes a user-facing message here.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
