//! Clients for the remote services: the asynchronous probability job API and the
//! geocoding API.

pub mod error;
pub mod geocoding;
pub mod http;
pub mod job_service;
