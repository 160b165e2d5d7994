/// Resource stores
///
/// Handlers never touch collections directly; they go through the
/// [`Repository`] trait, injected into the API state as `Arc<dyn Repository>`.
/// [`MemoryStore`] is the in-process implementation. A database-backed
/// implementation only has to satisfy the same trait.
///
/// # ID Assignment
///
/// Every collection assigns `max(existing ids) + 1`, or 1 when empty. IDs of
/// deleted records at the top of the range are therefore reused.
///
/// # Example
///
/// ```
/// use scoutstribe_shared::models::NewChannel;
/// use scoutstribe_shared::store::{MemoryStore, Repository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let channel = store
///     .insert_channel(NewChannel { name: "Grade 7".to_string(), grade: "7".to_string() })
///     .await?;
/// assert_eq!(channel.id, 1);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

use crate::models::{
    Attendance, Channel, Event, Member, Message, NewChannel, NewEvent, NewMember, NewMessage,
    NewUser, User,
};

pub mod memory;
pub mod seed;

pub use memory::MemoryStore;

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Another user already has this email
    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    /// A record referenced by a bulk operation does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    /// Underlying storage failed
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Storage seam for every resource collection
///
/// Each call is atomic with respect to other calls on the same store.
/// Nothing spans calls: a read followed by a write can interleave with
/// another request.
#[async_trait]
pub trait Repository: Send + Sync {
    // Users

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user(&self, id: u64) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user, rejecting duplicate emails
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    /// Replaces the user with the same ID; `None` if it does not exist
    async fn update_user(&self, user: User) -> StoreResult<Option<User>>;

    async fn delete_user(&self, id: u64) -> StoreResult<bool>;

    // Channels

    async fn list_channels(&self) -> StoreResult<Vec<Channel>>;

    async fn find_channel(&self, id: u64) -> StoreResult<Option<Channel>>;

    async fn insert_channel(&self, channel: NewChannel) -> StoreResult<Channel>;

    // Messages

    /// Messages of one channel in posting order
    async fn list_messages(&self, channel_id: u64) -> StoreResult<Vec<Message>>;

    async fn find_message(&self, id: u64) -> StoreResult<Option<Message>>;

    /// Inserts a message stamped with the current time
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message>;

    async fn update_message(&self, message: Message) -> StoreResult<Option<Message>>;

    async fn delete_message(&self, id: u64) -> StoreResult<bool>;

    // Members

    async fn list_members(&self) -> StoreResult<Vec<Member>>;

    async fn find_member(&self, id: u64) -> StoreResult<Option<Member>>;

    /// Inserts a member whose initial grade is its current grade
    async fn insert_member(&self, member: NewMember) -> StoreResult<Member>;

    async fn update_member(&self, member: Member) -> StoreResult<Option<Member>>;

    /// Replaces several members at once
    ///
    /// Fails with `StoreError::NotFound` without changing anything if any
    /// member is missing.
    async fn update_members(&self, members: Vec<Member>) -> StoreResult<Vec<Member>>;

    async fn delete_member(&self, id: u64) -> StoreResult<bool>;

    // Events

    async fn list_events(&self) -> StoreResult<Vec<Event>>;

    async fn find_event(&self, id: u64) -> StoreResult<Option<Event>>;

    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event>;

    // Attendance

    async fn list_attendance(&self) -> StoreResult<Vec<Attendance>>;

    /// Replaces all attendance rows of `event_id` with `records`
    async fn replace_attendance(
        &self,
        event_id: u64,
        records: Vec<Attendance>,
    ) -> StoreResult<Vec<Attendance>>;
}
