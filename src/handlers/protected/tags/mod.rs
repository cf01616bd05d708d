// handlers/protected/tags/mod.rs - Tag CRUD for the authenticated user
//
// Deleting a tag keeps the notes that carried it and only drops the reference.

pub mod create; // POST   /api/tags
pub mod delete; // DELETE /api/tags/:id
pub mod list; // GET    /api/tags
pub mod show; // GET    /api/tags/:id
pub mod update; // PUT    /api/tags/:id

pub use create::tag_create;
pub use delete::tag_delete;
pub use list::tag_list;
pub use show::tag_show;
pub use update::tag_update;
