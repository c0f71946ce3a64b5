//! Symmetric friendship management.
//!
//! A friendship between A and B is stored as the two directed edges `(A, B)`
//! and `(B, A)`. Mutations write or delete both edges inside one
//! [`UnitOfWork`](amity_store::UnitOfWork); readers never see only one half
//! of a pair produced by this module.

use amity_store::{Database, FriendProfile, FriendshipEdge, StoreError, UnitOfWork};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::validation::validate_friend_pair;

pub struct FriendshipGraph<'db> {
    db: &'db Database,
}

impl<'db> FriendshipGraph<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Befriend `user_id` and `friend_id` in both directions.
    ///
    /// The existence checks, the duplicate check and both inserts run inside
    /// a single immediate transaction. A concurrent writer that slips past the
    /// duplicate check still hits the primary key on `(user_id, friend_id)`
    /// and surfaces as [`CoreError::FriendshipExists`].
    pub fn add_friend(&self, user_id: Uuid, friend_id: Uuid) -> Result<()> {
        let uow = self.db.unit_of_work()?;

        if !uow.users().exists(user_id)? {
            return Err(CoreError::UserNotFound { id: user_id });
        }
        if !uow.users().exists(friend_id)? {
            return Err(CoreError::FriendNotFound { user_id, friend_id });
        }
        validate_friend_pair(user_id, friend_id).into_result()?;

        if uow.friendships().exists_edge(user_id, friend_id)? {
            warn!(%user_id, %friend_id, "friendship already exists");
            return Err(CoreError::FriendshipExists { user_id, friend_id });
        }

        let edge = FriendshipEdge::new(user_id, friend_id);
        insert_edge(&uow, &edge, user_id, friend_id)?;
        insert_edge(&uow, &edge.reversed(), user_id, friend_id)?;
        uow.commit()?;

        info!(%user_id, %friend_id, "friendship added");
        Ok(())
    }

    /// Drop the friendship between `user_id` and `friend_id`.
    ///
    /// Only `user_id` has to exist. Missing edges in either direction are not
    /// an error, so calling this twice is harmless.
    pub fn remove_friend(&self, user_id: Uuid, friend_id: Uuid) -> Result<()> {
        let uow = self.db.unit_of_work()?;

        if !uow.users().exists(user_id)? {
            return Err(CoreError::UserNotFound { id: user_id });
        }

        let forward = uow.friendships().remove(user_id, friend_id)?;
        let reverse = uow.friendships().remove(friend_id, user_id)?;
        uow.commit()?;

        if forward || reverse {
            info!(%user_id, %friend_id, forward, reverse, "friendship removed");
        } else {
            debug!(%user_id, %friend_id, "no friendship to remove");
        }
        Ok(())
    }

    /// Whether the single directed edge `(user_id, friend_id)` exists.
    ///
    /// Callers that need to confirm both halves must query both directions.
    pub fn are_friends(&self, user_id: Uuid, friend_id: Uuid) -> Result<bool> {
        Ok(self.db.friendships().exists_edge(user_id, friend_id)?)
    }

    /// Like [`are_friends`](Self::are_friends), but absence is an error.
    pub fn require_friends(&self, user_id: Uuid, friend_id: Uuid) -> Result<()> {
        if self.are_friends(user_id, friend_id)? {
            Ok(())
        } else {
            Err(CoreError::FriendshipNotFound { user_id, friend_id })
        }
    }

    /// Profiles of everyone `user_id` has an edge to. Order is unspecified.
    pub fn get_friends(&self, user_id: Uuid) -> Result<Vec<FriendProfile>> {
        let friends = self.db.friendships().edges_from(user_id)?;
        debug!(%user_id, count = friends.len(), "listed friends");
        Ok(friends)
    }
}

fn insert_edge(
    uow: &UnitOfWork<'_>,
    edge: &FriendshipEdge,
    user_id: Uuid,
    friend_id: Uuid,
) -> Result<()> {
    uow.friendships().insert(edge).map_err(|e| match e {
        StoreError::Duplicate(_) => {
            warn!(%user_id, %friend_id, "edge already present, rolling back");
            CoreError::FriendshipExists { user_id, friend_id }
        }
        other => other.into(),
    })
}
