pub mod folder;
pub mod note;
pub mod tag;
pub mod user;

pub use folder::Folder;
pub use note::{NewNote, Note, NotePatch};
pub use tag::Tag;
pub use user::{NewUser, User};
