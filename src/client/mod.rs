//! Client side of the service: an HTTP gateway plus the screen controllers a
//! front end drives (signup, login, profile wizard, mood capture).

pub mod api;
pub mod error;
pub mod flow;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, MoodSubmission, WellnessApi};
pub use error::{ClientError, ClientResult};
pub use session::{FileTokenStore, MemoryTokenStore, Session, TokenStore};
