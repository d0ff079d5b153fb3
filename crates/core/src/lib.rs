//! Proposal PDF conversion pipeline for Folio.
//!
//! This crate contains the conversion logic with ZERO web or database
//! dependencies. Collaborators (object storage, the rendering service, the
//! proposal store) sit behind traits so they can be swapped for fakes.
//!
//! # Modules
//!
//! - `storage` - Object storage for offloaded payloads (OpenDAL)
//! - `codec` - Gzip codec for offloaded payloads
//! - `render` - HTTP client for the external HTML-to-PDF service
//! - `proposal` - Proposal conversion-status persistence seam
//! - `conversion` - Upload grants, payload relay, and the conversion pipeline

pub mod codec;
pub mod conversion;
pub mod proposal;
pub mod render;
pub mod storage;
