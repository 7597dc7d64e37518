pub mod client;
pub mod error;
pub mod models;


pub use client::{OutscanClient, RawResponse, DEFAULT_BASE_URL};
pub use error::{OutscanError, Result};
pub use models::*;
