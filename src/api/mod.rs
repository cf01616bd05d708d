pub mod format;
pub mod input;

pub use format::{note_views, NoteView};
pub use input::{parse_id, JsonBody};
