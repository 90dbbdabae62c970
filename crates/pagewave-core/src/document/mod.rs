//! Document session domain module.
//!
//! - `model`: `DocumentSession`, `DocumentId`, `PageRequest`
//! - `service`: trait for the remote service that owns sessions

mod model;
mod service;

pub use model::{DocumentId, DocumentSession, PageRequest};
pub use service::SessionService;
