//! HTTP transport for the remote session service.

pub mod client;
pub mod worker;

pub use client::{ClientError, SessionClient};
pub use worker::{BackgroundSession, PendingRequests, WorkerStats};
