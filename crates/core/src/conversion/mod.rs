//! Proposal HTML to PDF conversion.
//!
//! Small payloads travel inline. Large payloads are gzipped by the client and
//! written straight to object storage through an [`UploadGrant`], then named
//! by storage key in the conversion request.
//!
//! - [`UploadGrantIssuer`] - presigned, size-bounded, short-lived write grants
//! - [`PayloadRelay`] - fetches and gunzips a stored payload
//! - [`ConversionAdapter`] - one call to the rendering service, no retry
//! - [`StatusRecorder`] - merges the outcome onto the proposal record
//! - [`TemporaryObject`] - removes the uploaded object once the attempt ends
//! - [`ConversionPipeline`] - runs all of the above for one attempt

mod adapter;
mod cleanup;
mod issuer;
mod pipeline;
mod recorder;
mod relay;
mod types;

#[cfg(test)]
pub(crate) mod fakes;

pub use adapter::{ConversionAdapter, sanitize_filename};
pub use cleanup::{TemporaryObject, discard};
pub use issuer::{DEFAULT_UPLOAD_CONTENT_TYPE, UploadGrantIssuer};
pub use pipeline::ConversionPipeline;
pub use recorder::StatusRecorder;
pub use relay::PayloadRelay;
pub use types::{
    ConversionRequest, ConversionRequestBody, ConversionResult, CssInput, DEFAULT_FILENAME,
    InlineContent, PayloadSource, ResolvedPayload, UploadGrant, UploadUrlRequestBody,
};
