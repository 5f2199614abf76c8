//! Faculty directory: office-hour lookup by teacher name.

pub mod resolver;

pub use resolver::{extract_name, DirectoryResolver, ASK_FOR_NAME, MAX_LISTED, MAX_SUGGESTIONS};
