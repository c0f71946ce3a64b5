//! CRUD operations for [`User`] records.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{format_ts, parse_ts, parse_uuid, User};

/// Repository handle over the `users` table.
pub struct UserStore<'c> {
    conn: &'c Connection,
}

impl<'c> UserStore<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    // ------------------------------------------------------------------
    // Create / update / delete
    // ------------------------------------------------------------------

    pub fn insert(&self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![user.id.to_string(), user.name, format_ts(&user.created_at)],
        )?;
        Ok(())
    }

    /// Update the mutable fields of a user. Returns `false` if no such user.
    pub fn update(&self, user: &User) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE users SET name = ?1 WHERE id = ?2",
            params![user.name, user.id.to_string()],
        )?;
        Ok(affected > 0)
    }

    /// Delete a user. Edges and messages referencing it cascade.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM users WHERE id = ?1",
                params![id.to_string()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// All users, unordered.
    pub fn get_all(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM users")?;

        let rows = stmt.query_map([], row_to_user)?;

        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    pub fn exists(&self, id: Uuid) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM users WHERE id = ?1",
                params![id.to_string()],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let name: String = row.get(1)?;
    let created_str: String = row.get(2)?;

    Ok(User {
        id: parse_uuid(0, &id_str)?,
        name,
        created_at: parse_ts(2, &created_str)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::Database;

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_and_fetch() {
        let db = Database::open_in_memory().unwrap();
        let alice = user("alice");
        db.users().insert(&alice).unwrap();

        let fetched = db.users().get_by_id(alice.id).unwrap().unwrap();
        assert_eq!(fetched.id, alice.id);
        assert_eq!(fetched.name, "alice");
        assert!(db.users().exists(alice.id).unwrap());
    }

    #[test]
    fn missing_user_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.users().get_by_id(Uuid::new_v4()).unwrap().is_none());
        assert!(!db.users().exists(Uuid::new_v4()).unwrap());
    }

    #[test]
    fn update_renames() {
        let db = Database::open_in_memory().unwrap();
        let mut alice = user("alice");
        db.users().insert(&alice).unwrap();

        alice.name = "alicia".into();
        assert!(db.users().update(&alice).unwrap());
        assert_eq!(db.users().get_by_id(alice.id).unwrap().unwrap().name, "alicia");

        assert!(!db.users().update(&user("ghost")).unwrap());
    }

    #[test]
    fn get_all_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let alice = user("alice");
        let bob = user("bob");
        db.users().insert(&alice).unwrap();
        db.users().insert(&bob).unwrap();

        assert_eq!(db.users().get_all().unwrap().len(), 2);
        assert!(db.users().delete(alice.id).unwrap());
        assert!(!db.users().delete(alice.id).unwrap());

        let rest = db.users().get_all().unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, bob.id);
    }
}
