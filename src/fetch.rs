//! Network stages: bearer token acquisition and the job postings download.
//!
//! Both stages return explicit results; deciding how loudly to fail is left to the caller.

pub mod postings;
pub mod token;

pub use postings::fetch_job_postings;
pub use token::fetch_access_token;

/// Endpoint label used in token stage errors.
pub const TOKEN_ENDPOINT: &str = "token";
/// Endpoint label used in job postings stage errors.
pub const JOB_POSTINGS_ENDPOINT: &str = "job postings";
