pub mod image_handle;
pub mod listing;
pub mod session;
pub mod shell;
