//! dugout: in-memory roster management core for a baseball league desktop
//! application.
//!
//! This crate is the data engine behind the GUI: an ordered roster of teams
//! with lookup/mutation operations, a single-level undo stack for stat
//! changes, and a row classifier that reconstructs typed instances from the
//! flat per-table batches the storage layer delivers. Dialogs, widgets,
//! plotting, and persistence are external collaborators.

pub mod config;
pub mod domain;
pub mod error;
pub mod services;

pub use config::AppConfig;
pub use domain::{League, Player, RosterList, StatChangeRecord, Team, UndoStack};
pub use error::{AppError, Result};
pub use services::{hydrate, InstanceBuilder, TableTag, TypedInstance};
