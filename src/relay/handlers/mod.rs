// relay/handlers/mod.rs - Upload route handlers
//
// Every handler validates the form first, then opens one transfer session,
// does its work and closes the session on every exit path.

pub mod chief_update; // POST /upload/chief-update - replace one document
pub mod documents;    // POST /upload/headman, /upload/villagehead - role documents
pub mod upload;       // POST /upload - single file

pub use chief_update::chief_update_post;
pub use documents::{headman_documents_post, villagehead_documents_post};
pub use upload::upload_post;
