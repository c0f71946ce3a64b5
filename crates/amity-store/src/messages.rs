//! Direct messages and the per-participant views that index them.

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{format_ts, parse_ts, parse_uuid, Message, ViewRole};

const MESSAGE_COLUMNS: &str = "m.id, m.sender_id, m.receiver_id, m.content, m.sent_at";

/// Repository handle over `messages` and the per-participant `message_views`.
pub struct MessageStore<'c> {
    conn: &'c Connection,
}

impl<'c> MessageStore<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, message: &Message) -> Result<()> {
        self.conn.execute(
            "INSERT INTO messages (id, sender_id, receiver_id, content, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id.to_string(),
                message.sender_id.to_string(),
                message.receiver_id.to_string(),
                message.content,
                format_ts(&message.sent_at),
            ],
        )?;
        Ok(())
    }

    /// Attach a stored message to one participant's view.
    pub fn add_view(&self, owner_id: Uuid, message_id: Uuid, role: ViewRole) -> Result<()> {
        self.conn.execute(
            "INSERT INTO message_views (owner_id, message_id, role) VALUES (?1, ?2, ?3)",
            params![owner_id.to_string(), message_id.to_string(), role.as_str()],
        )?;
        Ok(())
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Option<Message>> {
        let message = self
            .conn
            .query_row(
                &format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id = ?1"),
                params![id.to_string()],
                row_to_message,
            )
            .optional()?;
        Ok(message)
    }

    pub fn get_all(&self) -> Result<Vec<Message>> {
        self.query_messages(
            &format!("SELECT {MESSAGE_COLUMNS} FROM messages m ORDER BY m.sent_at DESC, m.rowid DESC"),
            &[],
        )
    }

    /// Messages exchanged between `a` and `b` in either direction, most
    /// recent first.
    pub fn messages_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        let (a, b) = (a.to_string(), b.to_string());
        self.query_messages(
            &format!(
                "SELECT {MESSAGE_COLUMNS}
                 FROM messages m
                 WHERE (m.sender_id = ?1 AND m.receiver_id = ?2)
                    OR (m.sender_id = ?2 AND m.receiver_id = ?1)
                 ORDER BY m.sent_at DESC, m.rowid DESC"
            ),
            &[&a, &b],
        )
    }

    /// The sender-side view of `user_id`, most recent first.
    pub fn sent_by(&self, user_id: Uuid) -> Result<Vec<Message>> {
        self.view(user_id, ViewRole::Sent)
    }

    /// The receiver-side view of `user_id`, most recent first.
    pub fn received_by(&self, user_id: Uuid) -> Result<Vec<Message>> {
        self.view(user_id, ViewRole::Received)
    }

    fn view(&self, owner_id: Uuid, role: ViewRole) -> Result<Vec<Message>> {
        let owner = owner_id.to_string();
        let role = role.as_str().to_string();
        self.query_messages(
            &format!(
                "SELECT {MESSAGE_COLUMNS}
                 FROM message_views v
                 JOIN messages m ON m.id = v.message_id
                 WHERE v.owner_id = ?1 AND v.role = ?2
                 ORDER BY m.sent_at DESC, m.rowid DESC"
            ),
            &[&owner, &role],
        )
    }

    fn query_messages(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Message>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let id_str: String = row.get(0)?;
    let sender_str: String = row.get(1)?;
    let receiver_str: String = row.get(2)?;
    let content: String = row.get(3)?;
    let ts_str: String = row.get(4)?;

    Ok(Message {
        id: parse_uuid(0, &id_str)?,
        sender_id: parse_uuid(1, &sender_str)?,
        receiver_id: parse_uuid(2, &receiver_str)?,
        content,
        sent_at: parse_ts(4, &ts_str)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::{Database, User};

    fn seed(db: &Database, name: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        db.users().insert(&user).unwrap();
        user.id
    }

    fn message(from: Uuid, to: Uuid, content: &str, minute: u32) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id: from,
            receiver_id: to,
            content: content.to_string(),
            sent_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn insert_and_get_by_id() {
        let db = Database::open_in_memory().unwrap();
        let a = seed(&db, "a");
        let b = seed(&db, "b");
        let msg = message(a, b, "hello", 0);

        db.messages().insert(&msg).unwrap();
        assert_eq!(db.messages().get_by_id(msg.id).unwrap(), Some(msg));
        assert!(db.messages().get_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn between_is_direction_agnostic_and_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let a = seed(&db, "a");
        let b = seed(&db, "b");
        let c = seed(&db, "c");

        let m1 = message(a, b, "one", 1);
        let m3 = message(a, b, "three", 3);
        let m2 = message(b, a, "two", 2);
        let other = message(a, c, "elsewhere", 4);
        for m in [&m1, &m3, &m2, &other] {
            db.messages().insert(m).unwrap();
        }

        let ab: Vec<_> = db.messages().messages_between(a, b).unwrap();
        let ba: Vec<_> = db.messages().messages_between(b, a).unwrap();
        let ids: Vec<_> = ab.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![m3.id, m2.id, m1.id]);
        assert_eq!(ab, ba);
        assert_eq!(db.messages().get_all().unwrap().len(), 4);
    }

    #[test]
    fn same_instant_keeps_insertion_order_reversed() {
        let db = Database::open_in_memory().unwrap();
        let a = seed(&db, "a");
        let b = seed(&db, "b");

        let first = message(a, b, "first", 5);
        let mut second = message(a, b, "second", 5);
        second.sent_at = first.sent_at;
        db.messages().insert(&first).unwrap();
        db.messages().insert(&second).unwrap();

        let ids: Vec<_> = db
            .messages()
            .messages_between(a, b)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn views_follow_roles() {
        let db = Database::open_in_memory().unwrap();
        let a = seed(&db, "a");
        let b = seed(&db, "b");

        let older = message(a, b, "older", 0);
        let mut newer = message(a, b, "newer", 0);
        newer.sent_at = older.sent_at + Duration::seconds(30);
        for m in [&older, &newer] {
            db.messages().insert(m).unwrap();
            db.messages().add_view(a, m.id, ViewRole::Sent).unwrap();
            db.messages().add_view(b, m.id, ViewRole::Received).unwrap();
        }

        let sent: Vec<_> = db.messages().sent_by(a).unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(sent, vec![newer.id, older.id]);
        assert_eq!(db.messages().received_by(b).unwrap().len(), 2);
        assert!(db.messages().received_by(a).unwrap().is_empty());
        assert!(db.messages().sent_by(b).unwrap().is_empty());
    }
}
