//! Train definition records and the content tree they are resolved against.

pub mod trainfile;
pub mod content;
