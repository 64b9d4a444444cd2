mod user;
mod entry;
mod forms;
mod session;

pub use user::{NewUser, Role, User, UserId};
pub use entry::{EntryId, EntryRequest, EntryScope, EntryView, HourUsage, NewEntry};
pub use forms::{FlashQuery, LoginForm, RecordForm};
pub use session::{AuthSession, AUTH_SESSION_KEY};
