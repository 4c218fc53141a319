//! Procurement-request portal glue: notification formatting, user
//! references, the Job Card hand-off, and admin/maintenance actions over
//! the managed backend.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::{Environment, PortalSettings, SettingsError};
