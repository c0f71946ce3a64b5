//! The operations offered to a boundary layer.

use std::path::Path;

use amity_store::{Database, FriendProfile, Message, User};
use uuid::Uuid;

use crate::directory::UserDirectory;
use crate::error::Result;
use crate::friendship::FriendshipGraph;
use crate::messaging::MessagingExchange;

/// Owns the database handle and hands out the three managers on demand.
pub struct SocialNetwork {
    db: Database,
}

impl SocialNetwork {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(Database::open_at(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn directory(&self) -> UserDirectory<'_> {
        UserDirectory::new(&self.db)
    }

    pub fn friendships(&self) -> FriendshipGraph<'_> {
        FriendshipGraph::new(&self.db)
    }

    pub fn messaging(&self) -> MessagingExchange<'_> {
        MessagingExchange::new(&self.db)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub fn create_user(&self, name: &str) -> Result<User> {
        self.directory().create(name)
    }

    pub fn get_user(&self, id: Uuid) -> Result<User> {
        self.directory().get_by_id(id)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        self.directory().get_all()
    }

    pub fn rename_user(&self, id: Uuid, name: &str) -> Result<User> {
        self.directory().rename(id, name)
    }

    pub fn delete_user(&self, id: Uuid) -> Result<()> {
        self.directory().delete(id)
    }

    // ------------------------------------------------------------------
    // Friendships
    // ------------------------------------------------------------------

    pub fn add_friend(&self, user_id: Uuid, friend_id: Uuid) -> Result<()> {
        self.friendships().add_friend(user_id, friend_id)
    }

    pub fn remove_friend(&self, user_id: Uuid, friend_id: Uuid) -> Result<()> {
        self.friendships().remove_friend(user_id, friend_id)
    }

    pub fn are_friends(&self, user_id: Uuid, friend_id: Uuid) -> Result<bool> {
        self.friendships().are_friends(user_id, friend_id)
    }

    pub fn require_friends(&self, user_id: Uuid, friend_id: Uuid) -> Result<()> {
        self.friendships().require_friends(user_id, friend_id)
    }

    pub fn list_friends(&self, user_id: Uuid) -> Result<Vec<FriendProfile>> {
        self.friendships().get_friends(user_id)
    }

    // ------------------------------------------------------------------
    // Messages
    // ------------------------------------------------------------------

    pub fn send_message(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message> {
        self.messaging().send_message(sender_id, receiver_id, content)
    }

    pub fn get_message(&self, id: Uuid) -> Result<Message> {
        self.messaging().get_message(id)
    }

    pub fn get_messages_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        self.messaging().messages_between(a, b)
    }

    pub fn sent_messages(&self, user_id: Uuid) -> Result<Vec<Message>> {
        self.messaging().sent_messages(user_id)
    }

    pub fn received_messages(&self, user_id: Uuid) -> Result<Vec<Message>> {
        self.messaging().received_messages(user_id)
    }
}
