//! # amity-store
//!
//! SQLite persistence for the Amity social graph.
//!
//! The crate exposes a synchronous [`Database`] handle wrapping a
//! `rusqlite::Connection`. Reads go through repository handles borrowed from
//! the database; multi-write operations go through a [`UnitOfWork`], which
//! commits explicitly and rolls back on drop.

pub mod database;
pub mod friendships;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod unit_of_work;
pub mod users;

mod error;

pub use database::Database;
pub use error::{Result, StoreError};
pub use friendships::FriendshipStore;
pub use messages::MessageStore;
pub use models::*;
pub use unit_of_work::UnitOfWork;
pub use users::UserStore;
