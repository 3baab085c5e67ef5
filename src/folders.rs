//! Folder management on the flat list.
//!
//! Folders only exist through paths, so renaming or deleting one rewrites or
//! removes every record at or below it. An `is_folder` record gives a folder
//! an id and keeps it alive while it has no bookmarks.

use crate::{
    bookmarks::Bookmark,
    eid::Eid,
    errors::FolderError,
    path::{self, PathError},
    query,
};

/// A fresh `is_folder` record for the raw folder name `name` under `parent`.
pub fn new_folder(owner_key: &str, parent: &str, name: &str) -> Result<Bookmark, FolderError> {
    path::validate(parent)?;
    let segment = to_segment(name)?;
    Ok(Bookmark {
        id: Eid::new(),
        ..Bookmark::folder(owner_key, &segment, parent)
    })
}

/// Adds a folder record unless that folder already has one. A folder known
/// only from its bookmarks gains an id this way.
pub fn create_folder(
    bookmarks: &mut Vec<Bookmark>,
    owner_key: &str,
    parent: &str,
    name: &str,
) -> Result<Bookmark, FolderError> {
    let record = new_folder(owner_key, parent, name)?;
    if query::folder_record(bookmarks, parent, &record.name).is_some() {
        return Err(FolderError::AlreadyExists(path::append_segment(
            parent,
            &record.name,
        )?));
    }
    bookmarks.push(record.clone());
    Ok(record)
}

/// Renames the folder at `folder_path`. Returns how many records changed.
pub fn rename_folder(
    bookmarks: &mut [Bookmark],
    folder_path: &str,
    new_name: &str,
) -> Result<usize, FolderError> {
    path::validate(folder_path)?;
    let (parent, old_name) = path::split_last(folder_path).ok_or(FolderError::Root)?;
    let (parent, old_name) = (parent.to_string(), old_name.to_string());

    let new_segment = to_segment(new_name)?;
    let new_path = path::append_segment(&parent, &new_segment)?;

    if !exists(bookmarks, &parent, &old_name) {
        return Err(FolderError::NotFound(folder_path.to_string()));
    }
    if new_path == folder_path {
        return Ok(0);
    }
    if exists(bookmarks, &parent, &new_segment) {
        return Err(FolderError::AlreadyExists(new_path));
    }

    let mut changed = 0;
    for record in bookmarks.iter_mut() {
        if path::is_within(folder_path, &record.path) {
            record.path = format!("{new_path}{}", &record.path[folder_path.len()..]);
            changed += 1;
        } else if record.is_folder && record.path == parent && record.name == old_name {
            record.name = new_segment.clone();
            changed += 1;
        }
    }

    log::info!("renamed folder {folder_path:?} to {new_path:?} ({changed} records)");
    Ok(changed)
}

/// Removes the folder at `folder_path` with everything in it. Returns how
/// many records were removed.
pub fn delete_folder(bookmarks: &mut Vec<Bookmark>, folder_path: &str) -> Result<usize, FolderError> {
    path::validate(folder_path)?;
    let (parent, name) = path::split_last(folder_path).ok_or(FolderError::Root)?;

    let before = bookmarks.len();
    bookmarks.retain(|record| {
        let inside = path::is_within(folder_path, &record.path);
        let own_record = record.is_folder && record.path == parent && record.name == name;
        !(inside || own_record)
    });

    let removed = before - bookmarks.len();
    if removed == 0 {
        return Err(FolderError::NotFound(folder_path.to_string()));
    }

    log::info!("deleted folder {folder_path:?} ({removed} records)");
    Ok(removed)
}

fn to_segment(name: &str) -> Result<String, PathError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(PathError::EmptySegment);
    }
    Ok(path::encode_segment(name))
}

fn exists(bookmarks: &[Bookmark], parent: &str, name: &str) -> bool {
    let Ok(folder_path) = path::append_segment(parent, name) else {
        return false;
    };
    query::folder_record(bookmarks, parent, name).is_some()
        || bookmarks
            .iter()
            .any(|b| path::is_within(&folder_path, &b.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree;

    fn bm(name: &str, path: &str) -> Bookmark {
        Bookmark::new("o", name, path, "https://example.com/")
    }

    fn paths(bookmarks: &[Bookmark]) -> Vec<&str> {
        bookmarks.iter().map(|b| b.path.as_str()).collect()
    }

    #[test]
    fn created_folder_shows_up_empty_with_its_id() {
        let mut list = vec![bm("a", ",A,")];
        let record = create_folder(&mut list, "o", ",A,", "Later, maybe").unwrap();
        assert!(record.is_folder && !record.id.is_empty());
        assert_eq!(record.name, "Later%2C maybe");

        let root = tree::build_root(&list);
        let later = &root.folders[0].folders[0];
        assert_eq!(later.id, record.id);
        assert_eq!(later.display_name(), "Later, maybe");

        assert!(matches!(
            create_folder(&mut list, "o", ",A,", "Later, maybe"),
            Err(FolderError::AlreadyExists(_))
        ));
    }

    #[test]
    fn new_folder_rejects_bad_input() {
        assert_eq!(
            new_folder("o", ",", "  ").unwrap_err(),
            FolderError::Path(PathError::EmptySegment)
        );
        assert!(matches!(
            new_folder("o", "nope", "x"),
            Err(FolderError::Path(PathError::Malformed(_)))
        ));
    }

    #[test]
    fn rename_rewrites_descendants_and_folder_record() {
        let mut list = vec![
            bm("a", ",A,"),
            bm("b", ",A,B,"),
            bm("ab", ",AB,"),
            Bookmark::folder("o", "A", ","),
        ];
        let changed = rename_folder(&mut list, ",A,", "Z").unwrap();
        assert_eq!(changed, 3);
        assert_eq!(paths(&list), vec![",Z,", ",Z,B,", ",AB,", ","]);
        assert_eq!(list[3].name, "Z");
    }

    #[test]
    fn rename_errors() {
        let mut list = vec![bm("a", ",A,"), bm("b", ",B,")];
        assert_eq!(rename_folder(&mut list, ",", "x"), Err(FolderError::Root));
        assert_eq!(
            rename_folder(&mut list, ",Missing,", "x"),
            Err(FolderError::NotFound(",Missing,".to_string()))
        );
        assert_eq!(
            rename_folder(&mut list, ",A,", "B"),
            Err(FolderError::AlreadyExists(",B,".to_string()))
        );
        assert_eq!(rename_folder(&mut list, ",A,", "A"), Ok(0));
    }

    #[test]
    fn delete_removes_subtree_and_record() {
        let mut list = vec![
            bm("a", ",A,"),
            bm("b", ",A,B,"),
            bm("c", ",C,"),
            Bookmark::folder("o", "A", ","),
            Bookmark::folder("o", "Empty", ","),
        ];
        assert_eq!(delete_folder(&mut list, ",A,"), Ok(3));
        assert_eq!(paths(&list), vec![",C,", ","]);

        assert_eq!(delete_folder(&mut list, ",Empty,"), Ok(1));
        assert_eq!(
            delete_folder(&mut list, ",Empty,"),
            Err(FolderError::NotFound(",Empty,".to_string()))
        );
        assert_eq!(delete_folder(&mut list, ","), Err(FolderError::Root));
    }
}
