//! External HTML-to-PDF rendering service.
//!
//! One HTTP call per conversion attempt, no retries. Error bodies from the
//! service are kept verbatim so operators can see what it objected to.

mod client;
mod error;

pub use client::{RenderClient, RenderRequest, Renderer};
pub use error::RenderError;
