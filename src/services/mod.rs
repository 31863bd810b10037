// LinkStash services
// Services wrap the best-effort external collaborators: page metadata,
// summarization, and the add-bookmark workflow that combines them.

pub mod metadata;
pub mod save_workflow;
pub mod summary;
