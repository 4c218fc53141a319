//! Domain model, services, and ports.
//!
//! Purpose: hold the portal's business rules independently of the managed
//! backend. Services talk to the outside world only through [`ports`];
//! formatting of amounts, dates, and links lives in the `notify-format`
//! crate and is re-used here.
//!
//! Public surface:
//! - AuthenticatedUser: signed-in user read from the identity store.
//! - UserReference / map_to_user_reference: canonical user references.
//! - RedirectController: one-shot hand-off to the Job Card system.
//! - SessionResetService / SessionSnapshot: admin debug panel actions.
//! - EmailTestService / NotificationService: callable email functions.
//! - CountryDocumentsQuery: maintenance lookup by country.

pub mod country_documents;
pub mod error;
pub mod job_card_redirect;
pub mod notification;
pub mod ports;
pub mod session_reset;
pub mod session_snapshot;
pub mod user;
pub mod user_reference;

pub use self::country_documents::{CountryDocumentsQuery, DocumentSummary};
pub use self::email_test::{EmailTestService, TestEmailOutcome, TestEmailRequest};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::job_card_redirect::{
    JobCardOrigin, JobCardOriginError, RedirectController, RedirectState, RedirectView,
};
pub use self::notification::{NotificationEmail, NotificationService, PrNotification};
pub use self::session_reset::{SessionResetOutcome, SessionResetService};
pub use self::session_snapshot::SessionSnapshot;
pub use self::user::AuthenticatedUser;
pub use self::user_reference::{ExternalUser, UserReference, map_to_user_reference};
