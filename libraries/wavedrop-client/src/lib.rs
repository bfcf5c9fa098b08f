//! Wavedrop - Backend Client
//!
//! HTTP implementation of the Wavedrop service traits against a
//! Supabase-style backend:
//! - metadata queries and inserts over the REST surface
//! - blob upload, signed playback URLs, and download over object storage
//! - session management with auth-change notifications
//! - the four-step upload flow (validate, probe, upload, insert)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wavedrop_client::{ClientConfig, Uploader, WavedropClient};
//!
//! let client = Arc::new(WavedropClient::new(ClientConfig::new(
//!     "https://abc.supabase.example",
//!     "anon-key",
//! ))?);
//!
//! // The same client serves as both storage and auth service.
//! let uploader = Uploader::new(client.clone(), client.clone(), probe, notifier);
//! ```

mod auth;
mod client;
mod error;
mod rest;
mod service;
mod storage;
mod types;
pub mod upload;

// Public exports
pub use client::WavedropClient;
pub use error::{ClientError, ClientResult};
pub use types::ClientConfig;
pub use upload::{
    UploadRequest, Uploader, MAX_TITLE_CHARS, MAX_UPLOAD_BYTES, MIN_UPLOAD_BYTES,
};
