//! Identity contract between the gateway and the ladle API.
//!
//! The gateway terminates sessions and forwards the caller's id as a
//! request header; services never see credentials.

pub mod identity;
