//! Fetch job postings guarded by an OAuth 2.0 client-credentials grant and export them as an
//! XML feed on disk.
//!
//! The crate is organized around the three stages of an export run: [`fetch::token`] obtains a
//! bearer token, [`fetch::postings`] downloads the raw JSON payload, and [`xml`] maps that payload
//! onto an XML document and persists it. [`pipeline::Pipeline`] chains the stages and turns every
//! stage failure into a logged soft failure.

#![deny(clippy::all, missing_docs)]

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod obs;
pub mod pipeline;
pub mod xml;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		path::{Path, PathBuf},
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2::{AccessToken, ClientId, ClientSecret};
pub use reqwest;
pub use url;
