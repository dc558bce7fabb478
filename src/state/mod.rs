//! Widget session state.
//!
//! DESIGN
//! ======
//! `message` defines the persisted record, `session` holds the pure state
//! machine, and `controller` drives one send cycle against the backend and
//! storage seams.

pub mod controller;
pub mod message;
pub mod session;
