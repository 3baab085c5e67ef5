use serde::{Deserialize, Serialize};

use crate::{
    bookmarks::{Bookmark, Folder},
    eid::Eid,
    path::{self, PathError},
    tree,
};

/// How a "get one folder" target is matched against record paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// The target names a folder path; records in it or below it match.
    #[default]
    SegmentPrefix,
    /// Case-insensitive substring of the record path. Matches what older
    /// deployments returned, including unrelated folders sharing a fragment.
    Substring,
}

/// Records belonging to the folder `target`, in list order.
///
/// With [`MatchMode::SegmentPrefix`] the target is a folder name (`"A"`), a
/// comma list (`"A,B"`) or a full path (`",A,B,"`).
pub fn get_folder(
    bookmarks: &[Bookmark],
    target: &str,
    mode: MatchMode,
) -> Result<Vec<Bookmark>, PathError> {
    let matched = match mode {
        MatchMode::SegmentPrefix => {
            let target_path = path::from_target(target)?;
            bookmarks
                .iter()
                .filter(|b| path::is_within(&target_path, &b.path))
                .cloned()
                .collect::<Vec<_>>()
        }
        MatchMode::Substring => {
            let needle = target.to_lowercase();
            bookmarks
                .iter()
                .filter(|b| b.path.to_lowercase().contains(&needle))
                .cloned()
                .collect::<Vec<_>>()
        }
    };

    log::debug!(
        "folder query {target:?} ({mode:?}) matched {} of {} records",
        matched.len(),
        bookmarks.len()
    );
    Ok(matched)
}

/// The tree rooted at `target_path`, or `None` when nothing lives there.
pub fn subtree(bookmarks: &[Bookmark], target_path: &str) -> Option<Folder> {
    if target_path == path::ROOT {
        return Some(tree::build_root(bookmarks));
    }

    let (parent, name) = path::split_last(target_path)?;
    let record = folder_record(bookmarks, parent, name);
    let populated = bookmarks
        .iter()
        .any(|b| path::is_within(target_path, &b.path));

    if record.is_none() && !populated {
        return None;
    }

    let id = record.map(|r| r.id.clone()).unwrap_or_else(Eid::empty);
    Some(tree::build(bookmarks, id, name, target_path))
}

/// Finds the folder at `target_path` inside an already built tree.
pub fn find_folder<'a>(root: &'a Folder, target_path: &str) -> Option<&'a Folder> {
    let mut current = root;
    for segment in path::segments(target_path) {
        current = current.folders.iter().find(|f| f.name == segment)?;
    }
    Some(current)
}

/// The `is_folder` record standing for `name` under `parent`, if any.
pub fn folder_record<'a>(bookmarks: &'a [Bookmark], parent: &str, name: &str) -> Option<&'a Bookmark> {
    bookmarks
        .iter()
        .find(|b| b.is_folder && b.path == parent && b.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bm(name: &str, path: &str) -> Bookmark {
        Bookmark::new("o", name, path, "https://example.com/")
    }

    fn names(bookmarks: &[Bookmark]) -> Vec<&str> {
        bookmarks.iter().map(|b| b.name.as_str()).collect()
    }

    fn sample() -> Vec<Bookmark> {
        vec![
            bm("root", ","),
            bm("work", ",Work,"),
            bm("homework", ",School,Homework,"),
            bm("deep", ",Work,Projects,"),
            bm("network", ",Network,"),
            bm("lower", ",work,"),
        ]
    }

    #[test]
    fn prefix_mode_matches_folder_and_descendants_only() {
        let list = sample();
        let got = get_folder(&list, "Work", MatchMode::SegmentPrefix).unwrap();
        assert_eq!(names(&got), vec!["work", "deep"]);

        let got = get_folder(&list, ",Work,Projects,", MatchMode::SegmentPrefix).unwrap();
        assert_eq!(names(&got), vec!["deep"]);

        let got = get_folder(&list, "School,Homework", MatchMode::SegmentPrefix).unwrap();
        assert_eq!(names(&got), vec!["homework"]);
    }

    #[test]
    fn prefix_mode_on_root_returns_everything() {
        let list = sample();
        assert_eq!(
            get_folder(&list, ",", MatchMode::SegmentPrefix).unwrap().len(),
            list.len()
        );
    }

    #[test]
    fn substring_mode_reproduces_loose_matching() {
        let list = sample();
        let got = get_folder(&list, "work", MatchMode::Substring).unwrap();
        assert_eq!(names(&got), vec!["work", "homework", "deep", "network", "lower"]);
    }

    #[test]
    fn malformed_target_is_rejected() {
        assert!(get_folder(&sample(), "A,,B", MatchMode::SegmentPrefix).is_err());
    }

    #[test]
    fn subtree_of_existing_and_missing_folders() {
        let mut list = sample();
        let work = subtree(&list, ",Work,").unwrap();
        assert_eq!(work.name, "Work");
        assert_eq!(work.path, ",");
        assert_eq!(names(&work.bookmarks), vec!["work"]);
        assert_eq!(work.folders[0].name, "Projects");
        assert!(work.id.is_empty());

        assert!(subtree(&list, ",Nope,").is_none());

        list.push(Bookmark {
            id: Eid::from("empty-id"),
            ..Bookmark::folder("o", "Nope", ",")
        });
        let nope = subtree(&list, ",Nope,").unwrap();
        assert_eq!(&*nope.id, "empty-id");
        assert!(nope.bookmarks.is_empty() && nope.folders.is_empty());
    }

    #[test]
    fn find_folder_walks_a_built_tree() {
        let root = tree::build_root(&sample());
        let projects = find_folder(&root, ",Work,Projects,").unwrap();
        assert_eq!(names(&projects.bookmarks), vec!["deep"]);
        assert!(find_folder(&root, ",Work,Missing,").is_none());
        assert_eq!(find_folder(&root, ",").unwrap().folders.len(), root.folders.len());
    }
}
