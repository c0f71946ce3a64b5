//! Direct messages between two users.

use amity_store::{Database, Message, ViewRole};
use chrono::{SubsecRound, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::validation::validate_message;

pub struct MessagingExchange<'db> {
    db: &'db Database,
}

impl<'db> MessagingExchange<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Store a message from `sender_id` to `receiver_id`.
    ///
    /// The message row and both participants' views are committed together.
    /// The sender is resolved first; the receiver only if the sender exists.
    pub fn send_message(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message> {
        validate_message(sender_id, receiver_id, content).into_result()?;

        let uow = self.db.unit_of_work()?;
        for id in [sender_id, receiver_id] {
            if !uow.users().exists(id)? {
                return Err(CoreError::UserNotFound { id });
            }
        }

        let message = Message {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            content: content.to_string(),
            sent_at: Utc::now().trunc_subsecs(6),
        };

        let messages = uow.messages();
        messages.insert(&message)?;
        messages.add_view(sender_id, message.id, ViewRole::Sent)?;
        messages.add_view(receiver_id, message.id, ViewRole::Received)?;
        uow.commit()?;

        info!(id = %message.id, %sender_id, %receiver_id, "message sent");
        Ok(message)
    }

    pub fn get_message(&self, id: Uuid) -> Result<Message> {
        self.db
            .messages()
            .get_by_id(id)?
            .ok_or(CoreError::MessageNotFound { id })
    }

    /// Every message exchanged between `a` and `b`, newest first.
    ///
    /// Unknown ids yield an empty list rather than an error.
    pub fn messages_between(&self, a: Uuid, b: Uuid) -> Result<Vec<Message>> {
        let messages = self.db.messages().messages_between(a, b)?;
        debug!(%a, %b, count = messages.len(), "loaded conversation");
        Ok(messages)
    }

    /// Messages `user_id` has sent, newest first.
    pub fn sent_messages(&self, user_id: Uuid) -> Result<Vec<Message>> {
        self.require_user(user_id)?;
        Ok(self.db.messages().sent_by(user_id)?)
    }

    /// Messages `user_id` has received, newest first.
    pub fn received_messages(&self, user_id: Uuid) -> Result<Vec<Message>> {
        self.require_user(user_id)?;
        Ok(self.db.messages().received_by(user_id)?)
    }

    fn require_user(&self, id: Uuid) -> Result<()> {
        if self.db.users().exists(id)? {
            Ok(())
        } else {
            Err(CoreError::UserNotFound { id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::UserDirectory;

    fn setup() -> (Database, Uuid, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let (a, b) = {
            let dir = UserDirectory::new(&db);
            (dir.create("alice").unwrap().id, dir.create("bob").unwrap().id)
        };
        (db, a, b)
    }

    #[test]
    fn send_round_trip() {
        let (db, a, b) = setup();
        let exchange = MessagingExchange::new(&db);

        let sent = exchange.send_message(a, b, "hi").unwrap();
        assert_eq!(sent.sender_id, a);
        assert_eq!(sent.receiver_id, b);
        assert_eq!(sent.content, "hi");
        assert!(!sent.id.is_nil());

        assert_eq!(exchange.get_message(sent.id).unwrap(), sent);
        assert_eq!(exchange.messages_between(a, b).unwrap(), vec![sent.clone()]);
        assert_eq!(exchange.messages_between(b, a).unwrap(), vec![sent.clone()]);
        assert_eq!(exchange.sent_messages(a).unwrap(), vec![sent.clone()]);
        assert_eq!(exchange.received_messages(b).unwrap(), vec![sent]);
        assert!(exchange.received_messages(a).unwrap().is_empty());
    }

    #[test]
    fn missing_participants() {
        let (db, a, _) = setup();
        let exchange = MessagingExchange::new(&db);
        let ghost = Uuid::new_v4();

        assert!(matches!(
            exchange.send_message(ghost, a, "hi"),
            Err(CoreError::UserNotFound { id }) if id == ghost
        ));
        assert!(matches!(
            exchange.send_message(a, ghost, "hi"),
            Err(CoreError::UserNotFound { id }) if id == ghost
        ));
        assert!(db.messages().get_all().unwrap().is_empty());
    }

    #[test]
    fn sender_is_checked_before_receiver() {
        let (db, _, _) = setup();
        let exchange = MessagingExchange::new(&db);
        let (s, r) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(matches!(
            exchange.send_message(s, r, "hi"),
            Err(CoreError::UserNotFound { id }) if id == s
        ));
    }

    #[test]
    fn content_bounds() {
        let (db, a, b) = setup();
        let exchange = MessagingExchange::new(&db);

        assert!(matches!(exchange.send_message(a, b, ""), Err(CoreError::Validation(_))));
        assert!(matches!(
            exchange.send_message(a, b, &"x".repeat(501)),
            Err(CoreError::Validation(_))
        ));
        exchange.send_message(a, b, &"x".repeat(500)).unwrap();
    }

    #[test]
    fn unknown_ids_give_empty_history() {
        let (db, _, _) = setup();
        let exchange = MessagingExchange::new(&db);
        assert!(exchange
            .messages_between(Uuid::new_v4(), Uuid::new_v4())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn views_require_known_user() {
        let (db, _, _) = setup();
        let exchange = MessagingExchange::new(&db);
        assert!(matches!(
            exchange.sent_messages(Uuid::new_v4()),
            Err(CoreError::UserNotFound { .. })
        ));
        assert!(matches!(
            exchange.get_message(Uuid::new_v4()),
            Err(CoreError::MessageNotFound { .. })
        ));
    }

    #[test]
    fn failed_receiver_view_discards_message() {
        let (db, a, b) = setup();
        db.conn()
            .execute_batch(
                "CREATE TEMP TRIGGER reject_received_view
                 BEFORE INSERT ON message_views WHEN NEW.role = 'received'
                 BEGIN SELECT RAISE(ABORT, 'view rejected'); END;",
            )
            .unwrap();

        let exchange = MessagingExchange::new(&db);
        assert!(matches!(
            exchange.send_message(a, b, "hi"),
            Err(CoreError::Internal { .. })
        ));

        assert!(db.messages().get_all().unwrap().is_empty());
        assert!(db.messages().sent_by(a).unwrap().is_empty());
        assert!(db.messages().received_by(b).unwrap().is_empty());
    }
}
