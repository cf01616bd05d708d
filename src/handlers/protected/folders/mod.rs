// handlers/protected/folders/mod.rs - Folder CRUD for the authenticated user
//
// Every handler scopes its store calls to `AuthUser::id()`. Deleting a folder
// also deletes the notes filed under it.

pub mod create; // POST   /api/folders
pub mod delete; // DELETE /api/folders/:id
pub mod list; // GET    /api/folders
pub mod show; // GET    /api/folders/:id
pub mod update; // PUT    /api/folders/:id

pub use create::folder_create;
pub use delete::folder_delete;
pub use list::folder_list;
pub use show::folder_show;
pub use update::folder_update;
