//! Bookmark file ingestion and folder-tree reconstruction.
//!
//! [`parser`] turns a browser's legacy bookmark export into flat records
//! tagged with comma-delimited folder paths ([`path`]). [`tree`] rebuilds the
//! nested [`Folder`] hierarchy from such a list, [`query`] narrows it down to
//! one folder and [`folders`] edits folders on the flat list.

pub mod bookmarks;
pub mod config;
pub mod eid;
pub mod errors;
pub mod folders;
pub mod parser;
pub mod path;
pub mod query;
pub mod storage;
pub mod store;
pub mod tree;

#[cfg(test)]
mod tests;

pub use bookmarks::{Bookmark, Folder};
pub use errors::{FolderError, ImportError};
pub use parser::{parse, parse_bookmarks, BookmarkFileParser, ParseOptions, ParseReport};
pub use query::{get_folder, MatchMode};
pub use tree::{build, build_root};
