/// Domain models for ScoutsTribe
///
/// Plain data types shared between the store and the API. All of them
/// serialize with camelCase field names.
///
/// # Models
///
/// - `user`: Users, roles and the public user view
/// - `channel`: Grade-scoped channels and their messages
/// - `member`: Scout roster entries
/// - `event`: Events and attendance records

pub mod channel;
pub mod event;
pub mod member;
pub mod user;

pub use channel::{Channel, Message, NewChannel, NewMessage};
pub use event::{Attendance, Event, EventType, NewEvent};
pub use member::{Member, NewMember};
pub use user::{NewUser, Role, RoleSet, User, UserView};
