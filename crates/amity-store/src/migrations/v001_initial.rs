//! v001 -- Initial schema creation.
//!
//! Creates `users`, `friendships`, `messages` and `message_views`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id         TEXT PRIMARY KEY NOT NULL,     -- UUID v4
    name       TEXT NOT NULL,
    created_at TEXT NOT NULL                  -- RFC-3339, UTC, micros
);

-- ----------------------------------------------------------------
-- Friendships (one row per direction)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS friendships (
    user_id    TEXT NOT NULL,                 -- FK -> users(id)
    friend_id  TEXT NOT NULL,                 -- FK -> users(id)
    created_at TEXT NOT NULL,

    PRIMARY KEY (user_id, friend_id),
    CHECK (user_id <> friend_id),
    FOREIGN KEY (user_id)   REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (friend_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_friendships_friend_id ON friendships(friend_id);

-- ----------------------------------------------------------------
-- Messages
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS messages (
    id          TEXT PRIMARY KEY NOT NULL,    -- UUID v4
    sender_id   TEXT NOT NULL,                -- FK -> users(id)
    receiver_id TEXT NOT NULL,                -- FK -> users(id)
    content     TEXT NOT NULL,
    sent_at     TEXT NOT NULL,                -- RFC-3339, UTC, micros

    FOREIGN KEY (sender_id)   REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (receiver_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_messages_pair_ts
    ON messages(sender_id, receiver_id, sent_at DESC);

-- ----------------------------------------------------------------
-- Message views (sender's outbox / receiver's inbox)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS message_views (
    owner_id   TEXT NOT NULL,                 -- FK -> users(id)
    message_id TEXT NOT NULL,                 -- FK -> messages(id)
    role       TEXT NOT NULL CHECK (role IN ('sent', 'received')),

    PRIMARY KEY (owner_id, message_id, role),
    FOREIGN KEY (owner_id)   REFERENCES users(id)    ON DELETE CASCADE,
    FOREIGN KEY (message_id) REFERENCES messages(id) ON DELETE CASCADE
);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
