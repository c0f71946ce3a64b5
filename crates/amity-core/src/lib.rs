//! # amity-core
//!
//! The relationship-and-messaging consistency layer.
//!
//! - [`UserDirectory`] resolves and registers users.
//! - [`FriendshipGraph`] keeps friendships symmetric: both directed edges are
//!   written or removed inside one unit of work.
//! - [`MessagingExchange`] stores direct messages and both participants'
//!   views of them atomically.
//!
//! [`SocialNetwork`] bundles the three behind the operations a boundary
//! layer (HTTP, CLI) calls. Every operation returns a [`CoreError`] variant
//! instead of panicking, and none of them keeps state between calls.

pub mod directory;
pub mod error;
pub mod friendship;
pub mod messaging;
pub mod network;
pub mod validation;

pub use amity_store::{FriendProfile, Message, User};
pub use directory::UserDirectory;
pub use error::{CoreError, ErrorClass, Result};
pub use friendship::FriendshipGraph;
pub use messaging::MessagingExchange;
pub use network::SocialNetwork;
pub use validation::ValidationErrors;
