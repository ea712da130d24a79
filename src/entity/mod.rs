mod blog;

pub use blog::{BlogFields, BlogPatch, BlogRecord, BlogStatus, Category};
