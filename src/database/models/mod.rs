pub mod document;
pub mod role;
pub mod user;

pub use document::{Document, DocumentChanges, DocumentFilter, NewDocument};
pub use role::Role;
pub use user::{NewUser, User, UserChanges};
