//! # placard-cli
//!
//! Admin CLI for Placard.
//!
//! - `placard config ...`: inspect and edit the TOML configuration
//! - `placard acl ...`: grant, revoke and check permissions in an ACL state
//!   file, and list what a caller can reach through the ACL hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod acl_handlers;
pub mod cli;
pub mod config_handlers;

pub use cli::{AclAction, Cli, Command, ConfigAction};
