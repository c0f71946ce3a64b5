//! User registration and lookup.

use amity_store::{Database, User};
use chrono::{SubsecRound, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::validation::validate_user_name;

pub struct UserDirectory<'db> {
    db: &'db Database,
}

impl<'db> UserDirectory<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<User> {
        debug!(%id, "resolving user");
        self.db
            .users()
            .get_by_id(id)?
            .ok_or(CoreError::UserNotFound { id })
    }

    /// All registered users, in no particular order.
    pub fn get_all(&self) -> Result<Vec<User>> {
        Ok(self.db.users().get_all()?)
    }

    pub fn exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.db.users().exists(id)?)
    }

    /// Register a new user under a freshly generated id.
    pub fn create(&self, name: &str) -> Result<User> {
        validate_user_name(name).into_result()?;

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            // stored with microsecond precision
            created_at: Utc::now().trunc_subsecs(6),
        };
        self.db.users().insert(&user)?;

        info!(id = %user.id, "user created");
        Ok(user)
    }

    pub fn rename(&self, id: Uuid, name: &str) -> Result<User> {
        validate_user_name(name).into_result()?;

        let mut user = self.get_by_id(id)?;
        user.name = name.to_string();
        if !self.db.users().update(&user)? {
            return Err(CoreError::UserNotFound { id });
        }

        info!(%id, "user renamed");
        Ok(user)
    }

    /// Remove a user together with every edge and message referencing it.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let uow = self.db.unit_of_work()?;
        if !uow.users().delete(id)? {
            return Err(CoreError::UserNotFound { id });
        }
        uow.commit()?;

        info!(%id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_lookup() {
        let db = Database::open_in_memory().unwrap();
        let dir = UserDirectory::new(&db);

        let ada = dir.create("ada").unwrap();
        assert_eq!(dir.get_by_id(ada.id).unwrap(), ada);
        assert!(dir.exists(ada.id).unwrap());
        assert_eq!(dir.get_all().unwrap(), vec![ada]);
    }

    #[test]
    fn create_generates_distinct_ids() {
        let db = Database::open_in_memory().unwrap();
        let dir = UserDirectory::new(&db);

        let a = dir.create("same").unwrap();
        let b = dir.create("same").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn create_rejects_bad_names() {
        let db = Database::open_in_memory().unwrap();
        let dir = UserDirectory::new(&db);

        assert!(matches!(dir.create(""), Err(CoreError::Validation(_))));
        assert!(matches!(
            dir.create(&"n".repeat(101)),
            Err(CoreError::Validation(_))
        ));
        assert!(dir.get_all().unwrap().is_empty());
    }

    #[test]
    fn unknown_user() {
        let db = Database::open_in_memory().unwrap();
        let dir = UserDirectory::new(&db);
        let id = Uuid::new_v4();

        assert!(matches!(dir.get_by_id(id), Err(CoreError::UserNotFound { id: got }) if got == id));
        assert!(!dir.exists(id).unwrap());
        assert!(matches!(dir.rename(id, "x"), Err(CoreError::UserNotFound { .. })));
        assert!(matches!(dir.delete(id), Err(CoreError::UserNotFound { .. })));
    }

    #[test]
    fn rename_keeps_id() {
        let db = Database::open_in_memory().unwrap();
        let dir = UserDirectory::new(&db);
        let ada = dir.create("ada").unwrap();

        let renamed = dir.rename(ada.id, "lovelace").unwrap();
        assert_eq!(renamed.id, ada.id);
        assert_eq!(dir.get_by_id(ada.id).unwrap().name, "lovelace");
        assert!(matches!(dir.rename(ada.id, " "), Err(CoreError::Validation(_))));
    }

    #[test]
    fn delete_removes_user() {
        let db = Database::open_in_memory().unwrap();
        let dir = UserDirectory::new(&db);
        let ada = dir.create("ada").unwrap();

        dir.delete(ada.id).unwrap();
        assert!(!dir.exists(ada.id).unwrap());
    }
}
