//! Explicit transaction handle for multi-write operations.

use rusqlite::Transaction;

use crate::error::Result;
use crate::friendships::FriendshipStore;
use crate::messages::MessageStore;
use crate::users::UserStore;

/// A single atomic transaction boundary.
///
/// Writes made through the repository handles become visible only after
/// [`UnitOfWork::commit`]. Dropping the handle without committing rolls every
/// write back.
pub struct UnitOfWork<'db> {
    tx: Transaction<'db>,
}

impl<'db> UnitOfWork<'db> {
    pub(crate) fn new(tx: Transaction<'db>) -> Self {
        Self { tx }
    }

    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.tx)
    }

    pub fn friendships(&self) -> FriendshipStore<'_> {
        FriendshipStore::new(&self.tx)
    }

    pub fn messages(&self) -> MessageStore<'_> {
        MessageStore::new(&self.tx)
    }

    pub fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    /// Discard every write made so far.
    pub fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}
