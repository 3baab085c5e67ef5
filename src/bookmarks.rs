use serde::{Deserialize, Serialize};

use crate::{eid::Eid, path};

/// A flat, path-tagged record as produced by the parser and kept by the store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub id: Eid,
    pub owner_key: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_folder: bool,
}

impl Bookmark {
    pub fn new(owner_key: &str, name: &str, path: &str, url: &str) -> Self {
        Bookmark {
            id: Eid::empty(),
            owner_key: owner_key.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            url: url.to_string(),
            is_folder: false,
        }
    }

    /// Pseudo-record making the folder `name` under `parent` addressable.
    pub fn folder(owner_key: &str, name: &str, parent: &str) -> Self {
        Bookmark {
            id: Eid::empty(),
            owner_key: owner_key.to_string(),
            name: name.to_string(),
            path: parent.to_string(),
            url: String::new(),
            is_folder: true,
        }
    }

    /// Full path of the folder this record stands for, if it is a folder record.
    pub fn folder_path(&self) -> Option<String> {
        if !self.is_folder {
            return None;
        }
        path::append_segment(&self.path, &self.name).ok()
    }

    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
            && path::is_valid(&self.path)
            && (self.is_folder || !self.url.is_empty())
    }
}

/// A node of the reconstructed hierarchy. `path` is the parent path, so every
/// direct child bookmark sits at `path + name + ","`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Folder {
    pub id: Eid,
    pub name: String,
    pub path: String,
    pub bookmarks: Vec<Bookmark>,
    pub folders: Vec<Folder>,
}

impl Folder {
    /// The path the folder's direct bookmarks carry.
    pub fn full_path(&self) -> String {
        if self.path.is_empty() {
            return path::ROOT.to_string();
        }
        path::append_segment(&self.path, &self.name).unwrap_or_else(|_| self.path.clone())
    }

    /// Folder name with separator escapes undone, for display.
    pub fn display_name(&self) -> String {
        path::decode_segment(&self.name)
    }

    /// Number of bookmarks in this folder and all folders below it.
    pub fn total_bookmarks(&self) -> usize {
        self.bookmarks.len()
            + self
                .folders
                .iter()
                .map(Folder::total_bookmarks)
                .sum::<usize>()
    }
}
