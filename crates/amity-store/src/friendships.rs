//! Directed friendship edges.
//!
//! The table only knows about single edges; pairing them into a symmetric
//! friendship is the caller's job, inside one [`UnitOfWork`](crate::UnitOfWork).

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{format_ts, parse_uuid, FriendProfile, FriendshipEdge};

/// Repository handle over the `friendships` table.
pub struct FriendshipStore<'c> {
    conn: &'c Connection,
}

impl<'c> FriendshipStore<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert one directed edge.
    ///
    /// Fails with [`StoreError::Duplicate`](crate::StoreError::Duplicate) if
    /// the edge already exists.
    pub fn insert(&self, edge: &FriendshipEdge) -> Result<()> {
        self.conn.execute(
            "INSERT INTO friendships (user_id, friend_id, created_at) VALUES (?1, ?2, ?3)",
            params![
                edge.user_id.to_string(),
                edge.friend_id.to_string(),
                format_ts(&Utc::now()),
            ],
        )?;
        Ok(())
    }

    /// Remove one directed edge. Returns `true` if a row was deleted.
    pub fn remove(&self, user_id: Uuid, friend_id: Uuid) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM friendships WHERE user_id = ?1 AND friend_id = ?2",
            params![user_id.to_string(), friend_id.to_string()],
        )?;
        Ok(affected > 0)
    }

    pub fn exists_edge(&self, user_id: Uuid, friend_id: Uuid) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM friendships WHERE user_id = ?1 AND friend_id = ?2",
                params![user_id.to_string(), friend_id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Number of rows stored for the directed edge (0 or 1 given the key).
    pub fn count_edge(&self, user_id: Uuid, friend_id: Uuid) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM friendships WHERE user_id = ?1 AND friend_id = ?2",
            params![user_id.to_string(), friend_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Every edge leaving `user_id`, joined to the friend's profile.
    pub fn edges_from(&self, user_id: Uuid) -> Result<Vec<FriendProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.name
             FROM friendships f
             JOIN users u ON u.id = f.friend_id
             WHERE f.user_id = ?1",
        )?;

        let rows = stmt.query_map(params![user_id.to_string()], |row| {
            let id_str: String = row.get(0)?;
            Ok(FriendProfile {
                id: parse_uuid(0, &id_str)?,
                name: row.get(1)?,
            })
        })?;

        let mut friends = Vec::new();
        for row in rows {
            friends.push(row?);
        }
        Ok(friends)
    }
}
