//! Outbound adapters implementing domain ports against real backends.

pub mod callable;
pub mod firestore;
pub mod session_file;
