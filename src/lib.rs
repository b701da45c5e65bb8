//! pseudo712: turns contract calldata into EIP-712 typed data so hardware
//! wallets can show a structured clear-signing screen instead of raw hex.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod server;

pub use app::{App, VerifyRequest};
pub use error::{ConvertError, Result};
