// handlers/protected/notes/mod.rs - Note CRUD for the authenticated user
//
// Reads (list, show) expand `folder` and `tags` into full objects. Writes
// answer with the stored note, where `tags` is a list of ids.

pub mod create; // POST   /api/notes
pub mod delete; // DELETE /api/notes/:id
pub mod list; // GET    /api/notes?searchTerm=&folderId=&tagId=
pub mod show; // GET    /api/notes/:id
pub mod update; // PUT    /api/notes/:id

pub use create::note_create;
pub use delete::note_delete;
pub use list::note_list;
pub use show::note_show;
pub use update::note_update;
