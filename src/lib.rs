//! xampp-mechanic library crate
//!
//! Repairs a XAMPP MySQL installation whose `data` directory no longer
//! starts: the live directory is archived, `backup` is installed in its
//! place, and user schemas plus the shared tablespace are merged back from
//! the archive. The binary wraps this in a terminal UI and a headless CLI.

pub mod app;
pub mod config;
pub mod error;
pub mod guard;
pub mod layout;
pub mod repair;
pub mod system;
pub mod ui;
pub mod util;

pub use error::{RepairError, Result};
