//! Rebuilds the folder hierarchy from flat, path-tagged records.
//!
//! Grouping follows the flat list: at every level direct bookmarks come
//! first, then child folders, each in the order their first record appears.
//! The list is indexed by exact path once, so each level walks the distinct
//! paths rather than every record.

use std::collections::HashMap;

use crate::{
    bookmarks::{Bookmark, Folder},
    eid::Eid,
    path,
};

struct PathGroup<'a> {
    path: &'a str,
    first_seen: usize,
    records: Vec<(usize, &'a Bookmark)>,
}

struct PathIndex<'a> {
    groups: Vec<PathGroup<'a>>,
    by_path: HashMap<&'a str, usize>,
}

impl<'a> PathIndex<'a> {
    fn new(bookmarks: &'a [Bookmark]) -> Self {
        let mut index = PathIndex {
            groups: vec![],
            by_path: HashMap::new(),
        };

        for (pos, bookmark) in bookmarks.iter().enumerate() {
            let slot = *index
                .by_path
                .entry(bookmark.path.as_str())
                .or_insert_with(|| {
                    index.groups.push(PathGroup {
                        path: bookmark.path.as_str(),
                        first_seen: pos,
                        records: vec![],
                    });
                    index.groups.len() - 1
                });
            index.groups[slot].records.push((pos, bookmark));
        }

        index
    }

    fn at(&self, path: &str) -> &[(usize, &'a Bookmark)] {
        self.by_path
            .get(path)
            .map(|&slot| self.groups[slot].records.as_slice())
            .unwrap_or(&[])
    }

    /// Child segments of `target` in first-occurrence order, with the id of
    /// the folder record naming each one, if any.
    fn children(&self, target: &str) -> Vec<(String, Eid)> {
        let mut found: Vec<(usize, &str, Option<&Eid>)> = vec![];

        for group in &self.groups {
            if let Some(segment) = path::next_segment(target, group.path) {
                found.push((group.first_seen, segment, None));
            }
        }

        for (pos, record) in self.at(target) {
            if record.is_folder {
                if record.name.is_empty() || record.name.contains(path::SEPARATOR) {
                    log::warn!("ignoring folder record with bad name {:?}", record.name);
                    continue;
                }
                found.push((*pos, record.name.as_str(), Some(&record.id)));
            }
        }

        found.sort_by_key(|(pos, _, _)| *pos);

        let mut children: Vec<(String, Eid)> = vec![];
        for (_, segment, id) in found {
            match children.iter_mut().find(|(name, _)| name == segment) {
                Some((_, existing)) => {
                    if existing.is_empty() {
                        if let Some(id) = id {
                            *existing = id.clone();
                        }
                    }
                }
                None => children.push((segment.to_string(), id.cloned().unwrap_or_default())),
            }
        }
        children
    }

    fn assemble(&self, id: Eid, name: &str, parent: &str, target: &str) -> Folder {
        let bookmarks = self
            .at(target)
            .iter()
            .filter(|(_, record)| !record.is_folder)
            .map(|(_, record)| (*record).clone())
            .collect();

        let folders = self
            .children(target)
            .into_iter()
            .filter_map(|(segment, id)| {
                let child = path::append_segment(target, &segment).ok()?;
                Some(self.assemble(id, &segment, target, &child))
            })
            .collect();

        Folder {
            id,
            name: name.to_string(),
            path: parent.to_string(),
            bookmarks,
            folders,
        }
    }
}

/// Builds the folder rooted at `root_path` from the flat list.
///
/// Folders known only from their descendants get an empty id; folders with
/// an `is_folder` record carry that record's id, even when they are empty.
pub fn build(bookmarks: &[Bookmark], root_id: Eid, root_name: &str, root_path: &str) -> Folder {
    let index = PathIndex::new(bookmarks);
    let parent = path::parent(root_path).unwrap_or_default();
    let folder = index.assemble(root_id, root_name, parent, root_path);

    log::debug!(
        "built tree at {root_path:?}: {} bookmarks, {} top-level folders",
        folder.total_bookmarks(),
        folder.folders.len()
    );
    folder
}

/// The whole tree, rooted at `","` with an empty id and name.
pub fn build_root(bookmarks: &[Bookmark]) -> Folder {
    build(bookmarks, Eid::empty(), "", path::ROOT)
}
