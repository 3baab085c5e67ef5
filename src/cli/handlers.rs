use std::{fs::File, io::BufReader, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use bbimport::{
    config::Config,
    folders,
    parser::BookmarkFileParser,
    path, query,
    query::MatchMode,
    store::BookmarkStore,
    tree,
};
use inquire::error::InquireResult;
use serde::Serialize;

#[derive(Serialize)]
struct ImportSummary {
    imported: usize,
    skipped: usize,
    skipped_samples: Vec<String>,
}

#[derive(Serialize)]
struct Changed {
    changed: usize,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn handle_import(
    file: &Path,
    owner: &str,
    dry_run: bool,
    config: &Config,
    store: &dyn BookmarkStore,
) -> Result<()> {
    let _span = tracing::info_span!("import", owner = %owner, file = %file.display()).entered();

    let reader = BufReader::new(
        File::open(file).with_context(|| format!("couldnt open {}", file.display()))?,
    );
    let parser = BookmarkFileParser::new(config.parse_options());
    let report = parser.parse(reader, owner)?;

    if dry_run {
        return print_json(&report);
    }

    let skipped = report.skipped;
    let skipped_samples = report.skipped_samples;
    let stored = store.insert_many(owner, report.bookmarks)?;

    print_json(&ImportSummary {
        imported: stored.len(),
        skipped,
        skipped_samples,
    })
}

pub fn handle_tree(owner: &str, root: Option<String>, store: &dyn BookmarkStore) -> Result<()> {
    let bookmarks = store.list(owner)?;

    let folder = match root {
        None => tree::build_root(&bookmarks),
        Some(root) => {
            let root_path = path::from_target(&root)?;
            query::subtree(&bookmarks, &root_path)
                .ok_or_else(|| anyhow!("folder {root_path} not found"))?
        }
    };

    print_json(&folder)
}

pub fn handle_folder(
    target: &str,
    owner: &str,
    substring: bool,
    config: &Config,
    store: &dyn BookmarkStore,
) -> Result<()> {
    let mode = if substring {
        MatchMode::Substring
    } else {
        config.query.match_mode
    };

    let bookmarks = store.list(owner)?;
    let matched = query::get_folder(&bookmarks, target, mode)?;
    print_json(&matched)
}

pub fn handle_mkdir(parent: &str, name: &str, owner: &str, store: &dyn BookmarkStore) -> Result<()> {
    let parent = path::from_target(parent)?;
    let mut bookmarks = store.list(owner)?;
    let record = folders::create_folder(&mut bookmarks, owner, &parent, name)?;
    store.replace(owner, bookmarks)?;
    print_json(&record)
}

pub fn handle_rename_folder(
    folder: &str,
    new_name: &str,
    owner: &str,
    store: &dyn BookmarkStore,
) -> Result<()> {
    let folder_path = path::from_target(folder)?;
    let mut bookmarks = store.list(owner)?;
    let changed = folders::rename_folder(&mut bookmarks, &folder_path, new_name)?;
    if changed > 0 {
        store.replace(owner, bookmarks)?;
    }
    print_json(&Changed { changed })
}

pub fn handle_rm_folder(folder: &str, owner: &str, yes: bool, store: &dyn BookmarkStore) -> Result<()> {
    let folder_path = path::from_target(folder)?;
    let mut bookmarks = store.list(owner)?;

    if !yes {
        let inside = query::get_folder(&bookmarks, &folder_path, MatchMode::SegmentPrefix)?
            .iter()
            .filter(|b| !b.is_folder)
            .count();
        match inquire::prompt_confirmation(format!(
            "Delete folder {folder_path} and the {inside} bookmarks in it?"
        )) {
            InquireResult::Ok(true) => {}
            InquireResult::Ok(false) => return Ok(()),
            InquireResult::Err(err) => bail!("An error occurred: {}", err),
        }
    }

    let changed = folders::delete_folder(&mut bookmarks, &folder_path)?;
    store.replace(owner, bookmarks)?;
    print_json(&Changed { changed })
}
