/// In-memory repository
///
/// All collections live behind a single `tokio::sync::RwLock`, so every
/// [`Repository`] call sees and leaves a consistent snapshot. Lookups are
/// linear scans; the expected data volume is one tribe.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{seed, Repository, StoreError, StoreResult};
use crate::auth::password::PasswordError;
use crate::models::{
    Attendance, Channel, Event, Member, Message, NewChannel, NewEvent, NewMember, NewMessage,
    NewUser, User,
};

/// Records addressable by an integer ID
trait Record: Clone {
    fn id(&self) -> u64;
}

macro_rules! impl_record {
    ($($ty:ty),*) => {
        $(impl Record for $ty {
            fn id(&self) -> u64 {
                self.id
            }
        })*
    };
}

impl_record!(User, Channel, Message, Member, Event);

/// Ordered collection with `max + 1` ID assignment
#[derive(Debug)]
struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Record> Table<T> {
    fn next_id(&self) -> u64 {
        self.rows.iter().map(Record::id).max().map_or(1, |max| max + 1)
    }

    fn all(&self) -> Vec<T> {
        self.rows.clone()
    }

    fn get(&self, id: u64) -> Option<T> {
        self.rows.iter().find(|row| row.id() == id).cloned()
    }

    fn insert_with(&mut self, build: impl FnOnce(u64) -> T) -> T {
        let row = build(self.next_id());
        self.rows.push(row.clone());
        row
    }

    fn replace(&mut self, row: T) -> Option<T> {
        let slot = self.rows.iter_mut().find(|existing| existing.id() == row.id())?;
        *slot = row.clone();
        Some(row)
    }

    fn remove(&mut self, id: u64) -> bool {
        match self.rows.iter().position(|row| row.id() == id) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    channels: Table<Channel>,
    messages: Table<Message>,
    members: Table<Member>,
    events: Table<Event>,
    attendance: Vec<Attendance>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.users
            .rows
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(email) && Some(user.id) != except)
    }

    fn insert_user(&mut self, user: NewUser) -> StoreResult<User> {
        if self.email_taken(&user.email, None) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        Ok(self.users.insert_with(|id| User {
            id,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
            grade: user.grade,
        }))
    }
}

/// Repository backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the default Admin, Tribe Leader and Counselor accounts
    ///
    /// # Errors
    ///
    /// Returns an error if hashing a default password fails.
    pub fn seeded() -> Result<Self, PasswordError> {
        let mut tables = Tables::default();

        for user in seed::default_users()? {
            // Fresh table: emails in the seed are distinct
            if let Err(e) = tables.insert_user(user) {
                tracing::warn!("skipping seed user: {}", e);
            }
        }

        tracing::info!(users = tables.users.rows.len(), "seeded default accounts");

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }
}

#[async_trait]
impl Repository for MemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.all())
    }

    async fn find_user(&self, id: u64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(id))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        self.tables.write().await.insert_user(user)
    }

    async fn update_user(&self, user: User) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;

        if tables.users.get(user.id).is_none() {
            return Ok(None);
        }

        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        Ok(tables.users.replace(user))
    }

    async fn delete_user(&self, id: u64) -> StoreResult<bool> {
        Ok(self.tables.write().await.users.remove(id))
    }

    async fn list_channels(&self) -> StoreResult<Vec<Channel>> {
        Ok(self.tables.read().await.channels.all())
    }

    async fn find_channel(&self, id: u64) -> StoreResult<Option<Channel>> {
        Ok(self.tables.read().await.channels.get(id))
    }

    async fn insert_channel(&self, channel: NewChannel) -> StoreResult<Channel> {
        Ok(self.tables.write().await.channels.insert_with(|id| Channel {
            id,
            name: channel.name,
            grade: channel.grade,
        }))
    }

    async fn list_messages(&self, channel_id: u64) -> StoreResult<Vec<Message>> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .rows
            .iter()
            .filter(|message| message.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn find_message(&self, id: u64) -> StoreResult<Option<Message>> {
        Ok(self.tables.read().await.messages.get(id))
    }

    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        Ok(self.tables.write().await.messages.insert_with(|id| Message {
            id,
            channel_id: message.channel_id,
            user_id: message.user_id,
            user_name: message.user_name,
            text: message.text,
            timestamp: Utc::now(),
            edited: false,
        }))
    }

    async fn update_message(&self, message: Message) -> StoreResult<Option<Message>> {
        Ok(self.tables.write().await.messages.replace(message))
    }

    async fn delete_message(&self, id: u64) -> StoreResult<bool> {
        Ok(self.tables.write().await.messages.remove(id))
    }

    async fn list_members(&self) -> StoreResult<Vec<Member>> {
        Ok(self.tables.read().await.members.all())
    }

    async fn find_member(&self, id: u64) -> StoreResult<Option<Member>> {
        Ok(self.tables.read().await.members.get(id))
    }

    async fn insert_member(&self, member: NewMember) -> StoreResult<Member> {
        Ok(self.tables.write().await.members.insert_with(|id| Member {
            id,
            first_name: member.first_name,
            last_name: member.last_name,
            initial_grade: member.grade.clone(),
            grade: member.grade,
            registration_year: member.registration_year,
        }))
    }

    async fn update_member(&self, member: Member) -> StoreResult<Option<Member>> {
        Ok(self.tables.write().await.members.replace(member))
    }

    async fn update_members(&self, members: Vec<Member>) -> StoreResult<Vec<Member>> {
        let mut tables = self.tables.write().await;

        if let Some(missing) = members
            .iter()
            .find(|member| tables.members.get(member.id).is_none())
        {
            return Err(StoreError::NotFound {
                kind: "Member",
                id: missing.id,
            });
        }

        Ok(members
            .into_iter()
            .filter_map(|member| tables.members.replace(member))
            .collect())
    }

    async fn delete_member(&self, id: u64) -> StoreResult<bool> {
        Ok(self.tables.write().await.members.remove(id))
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        Ok(self.tables.read().await.events.all())
    }

    async fn find_event(&self, id: u64) -> StoreResult<Option<Event>> {
        Ok(self.tables.read().await.events.get(id))
    }

    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event> {
        Ok(self.tables.write().await.events.insert_with(|id| Event {
            id,
            name: event.name,
            date: event.date,
            event_type: event.event_type,
            grade: event.grade,
            created_by: event.created_by,
        }))
    }

    async fn list_attendance(&self) -> StoreResult<Vec<Attendance>> {
        Ok(self.tables.read().await.attendance.clone())
    }

    async fn replace_attendance(
        &self,
        event_id: u64,
        records: Vec<Attendance>,
    ) -> StoreResult<Vec<Attendance>> {
        let mut tables = self.tables.write().await;

        tables.attendance.retain(|record| record.event_id != event_id);
        tables.attendance.extend(records.iter().cloned());

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, Role};
    use chrono::NaiveDate;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            roles: [Role::Counselor].into_iter().collect(),
            grade: Some("7".to_string()),
        }
    }

    fn new_member(first_name: &str, grade: &str) -> NewMember {
        NewMember {
            first_name: first_name.to_string(),
            last_name: "Levi".to_string(),
            grade: grade.to_string(),
            registration_year: "2025".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_max_plus_one() {
        let store = MemoryStore::new();

        let a = store.insert_member(new_member("A", "7")).await.unwrap();
        let b = store.insert_member(new_member("B", "7")).await.unwrap();
        let c = store.insert_member(new_member("C", "7")).await.unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        // Removing from the middle does not shift the next ID
        assert!(store.delete_member(2).await.unwrap());
        let d = store.insert_member(new_member("D", "7")).await.unwrap();
        assert_eq!(d.id, 4);

        // Removing the maximum frees its ID
        assert!(store.delete_member(4).await.unwrap());
        let e = store.insert_member(new_member("E", "7")).await.unwrap();
        assert_eq!(e.id, 4);
    }

    #[tokio::test]
    async fn test_insert_member_sets_initial_grade() {
        let store = MemoryStore::new();

        let member = store.insert_member(new_member("Noa", "5")).await.unwrap();
        assert_eq!(member.grade, "5");
        assert_eq!(member.initial_grade, "5");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();

        store.insert_user(new_user("a@example.com")).await.unwrap();
        let err = store.insert_user(new_user("A@example.com")).await.unwrap_err();
        assert_eq!(err, StoreError::DuplicateEmail("A@example.com".to_string()));

        assert!(store
            .find_user_by_email("A@EXAMPLE.COM")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_update_user_missing() {
        let store = MemoryStore::new();
        let mut user = store.insert_user(new_user("a@example.com")).await.unwrap();
        user.id = 42;

        assert_eq!(store.update_user(user).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_user_duplicate_email() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@example.com")).await.unwrap();
        let mut b = store.insert_user(new_user("b@example.com")).await.unwrap();
        b.email = "A@example.com".to_string();

        assert_eq!(
            store.update_user(b).await,
            Err(StoreError::DuplicateEmail("A@example.com".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_members_is_all_or_nothing() {
        let store = MemoryStore::new();
        let mut a = store.insert_member(new_member("A", "7")).await.unwrap();
        a.grade = "8".to_string();

        let mut ghost = a.clone();
        ghost.id = 99;

        let err = store.update_members(vec![a.clone(), ghost]).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound { kind: "Member", id: 99 });
        assert_eq!(store.find_member(a.id).await.unwrap().unwrap().grade, "7");

        let updated = store.update_members(vec![a.clone()]).await.unwrap();
        assert_eq!(updated[0].grade, "8");
    }

    #[tokio::test]
    async fn test_messages_filtered_by_channel() {
        let store = MemoryStore::new();

        for (channel_id, text) in [(1, "one"), (2, "two"), (1, "three")] {
            store
                .insert_message(NewMessage {
                    channel_id,
                    user_id: 1,
                    user_name: "admin".to_string(),
                    text: text.to_string(),
                })
                .await
                .unwrap();
        }

        let texts: Vec<String> = store
            .list_messages(1)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["one", "three"]);
    }

    #[tokio::test]
    async fn test_replace_attendance_replaces_only_that_event() {
        let store = MemoryStore::new();
        let record = |event_id, member_id| Attendance {
            event_id,
            member_id,
            attended: true,
            grade: "7".to_string(),
        };

        store
            .replace_attendance(1, vec![record(1, 1), record(1, 2)])
            .await
            .unwrap();
        store.replace_attendance(2, vec![record(2, 1)]).await.unwrap();
        store.replace_attendance(1, vec![record(1, 3)]).await.unwrap();

        let all = store.list_attendance().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&record(1, 3)));
        assert!(all.contains(&record(2, 1)));
    }

    #[tokio::test]
    async fn test_insert_event() {
        let store = MemoryStore::new();

        let event = store
            .insert_event(NewEvent {
                name: "Hike".to_string(),
                date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                event_type: EventType::Global,
                grade: None,
                created_by: 1,
            })
            .await
            .unwrap();

        assert_eq!(event.id, 1);
        assert_eq!(store.find_event(1).await.unwrap(), Some(event));
    }

    #[tokio::test]
    async fn test_seeded_accounts() {
        let store = MemoryStore::seeded().unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 3);
        assert!(users[0].has_role(Role::Admin));
        assert!(users[1].has_role(Role::TribeLeader));
        assert_eq!(users[2].grade.as_deref(), Some("8"));
    }
}
