use anyhow::{anyhow, bail, Context};
use std::{
    io::ErrorKind,
    sync::{Arc, RwLock},
    time::Instant,
};

use crate::{bookmarks::Bookmark, eid::Eid};

/// Persists flat bookmark lists per owner. Trees are never stored; callers
/// rebuild them from [`BookmarkStore::list`].
pub trait BookmarkStore: Send + Sync {
    /// Stores `bookmarks` for `owner_key`, assigning ids where missing.
    /// Nothing is stored if any record is invalid.
    fn insert_many(&self, owner_key: &str, bookmarks: Vec<Bookmark>) -> anyhow::Result<Vec<Bookmark>>;
    fn list(&self, owner_key: &str) -> anyhow::Result<Vec<Bookmark>>;
    /// Swaps the owner's whole list for `bookmarks`.
    fn replace(&self, owner_key: &str, bookmarks: Vec<Bookmark>) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct BackendCsv {
    list: Arc<RwLock<Vec<Bookmark>>>,
    path: String,
}

const CSV_HEADERS: [&str; 6] = ["id", "owner_key", "name", "path", "url", "is_folder"];

impl BackendCsv {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        if let Err(err) = std::fs::metadata(path) {
            match err.kind() {
                ErrorKind::NotFound => {
                    log::info!("Creating new database at {path}");
                    let mut csv_wrt = csv::Writer::from_path(path)?;
                    csv_wrt.write_record(CSV_HEADERS)?;
                    csv_wrt.flush()?;
                }
                _ => Err(err)?,
            }
        }

        let now = Instant::now();
        let mut csv_reader = csv::Reader::from_path(path)?;

        let mut bmarks = vec![];
        for record in csv_reader.records() {
            let record = record?;
            let field = |idx: usize| {
                record
                    .get(idx)
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("couldnt get record {}", CSV_HEADERS[idx]))
            };

            let is_folder = field(5)?
                .parse::<bool>()
                .context("couldnt parse record is_folder")?;

            bmarks.push(Bookmark {
                id: Eid::from(field(0)?),
                owner_key: field(1)?,
                name: field(2)?,
                path: field(3)?,
                url: field(4)?,
                is_folder,
            });
        }

        log::debug!(
            "took {}ms to read csv",
            now.elapsed().as_micros() as f64 / 1000.0
        );

        Ok(BackendCsv {
            list: Arc::new(RwLock::new(bmarks)),
            path: path.to_string(),
        })
    }

    fn save(&self, bmarks: &[Bookmark]) -> anyhow::Result<()> {
        let temp_path = format!("{}-tmp", &self.path);
        let mut csv_wrt = csv::Writer::from_path(&temp_path)?;
        csv_wrt.write_record(CSV_HEADERS)?;
        for bmark in bmarks {
            csv_wrt.write_record([
                &*bmark.id,
                bmark.owner_key.as_str(),
                bmark.name.as_str(),
                bmark.path.as_str(),
                bmark.url.as_str(),
                if bmark.is_folder { "true" } else { "false" },
            ])?;
        }
        csv_wrt.flush()?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("couldnt replace {}", self.path))?;
        Ok(())
    }

    fn stamp(owner_key: &str, bookmarks: Vec<Bookmark>) -> anyhow::Result<Vec<Bookmark>> {
        bookmarks
            .into_iter()
            .map(|mut bmark| {
                bmark.owner_key = owner_key.to_string();
                if bmark.id.is_empty() {
                    bmark.id = Eid::new();
                }
                if !bmark.is_valid() {
                    bail!("refusing to store invalid record {:?} at {:?}", bmark.name, bmark.path);
                }
                Ok(bmark)
            })
            .collect()
    }
}

impl BookmarkStore for BackendCsv {
    fn insert_many(&self, owner_key: &str, bookmarks: Vec<Bookmark>) -> anyhow::Result<Vec<Bookmark>> {
        let stamped = Self::stamp(owner_key, bookmarks)?;

        let mut bmarks = self
            .list
            .write()
            .map_err(|_| anyhow!("bookmark list lock poisoned"))?;
        let mut next = bmarks.clone();
        next.extend(stamped.iter().cloned());
        self.save(&next)?;
        *bmarks = next;

        log::info!("stored {} bookmarks for {owner_key}", stamped.len());
        Ok(stamped)
    }

    fn list(&self, owner_key: &str) -> anyhow::Result<Vec<Bookmark>> {
        let bmarks = self
            .list
            .read()
            .map_err(|_| anyhow!("bookmark list lock poisoned"))?;
        Ok(bmarks
            .iter()
            .filter(|b| b.owner_key == owner_key)
            .cloned()
            .collect())
    }

    fn replace(&self, owner_key: &str, bookmarks: Vec<Bookmark>) -> anyhow::Result<()> {
        let stamped = Self::stamp(owner_key, bookmarks)?;

        let mut bmarks = self
            .list
            .write()
            .map_err(|_| anyhow!("bookmark list lock poisoned"))?;
        let mut next = bmarks
            .iter()
            .filter(|b| b.owner_key != owner_key)
            .cloned()
            .collect::<Vec<_>>();
        next.extend(stamped);
        self.save(&next)?;
        *bmarks = next;

        Ok(())
    }
}
