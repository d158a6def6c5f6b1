//! Local name -> id cache for courses and topics.
//!
//! Each cache file is a plain JSON array of `{id, name}`. A lookup scans it
//! linearly; on a miss the whole file is rebuilt from the remote listing,
//! whether or not the name turns up there. Entries are never invalidated
//! otherwise, so a renamed remote entity stays invisible until the next miss.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::classroom::ClassroomClient;
use crate::error::AppError;
use crate::models::CacheEntry;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind<'a> {
    Course,
    Topic { course_id: &'a str },
}

pub struct CatalogCache {
    dir: PathBuf,
}

impl CatalogCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: CatalogKind<'_>) -> PathBuf {
        match kind {
            CatalogKind::Course => self.dir.join("courses.json"),
            CatalogKind::Topic { course_id } => self.dir.join(format!("topics-{}.json", course_id)),
        }
    }

    /// Returns the id for `target`, consulting the remote listing on a miss.
    /// `Ok(None)` means the name exists neither locally nor remotely.
    pub async fn resolve_id(
        &self,
        client: &dyn ClassroomClient,
        kind: CatalogKind<'_>,
        target: &str,
    ) -> Result<Option<String>, AppError> {
        let path = self.path_for(kind);

        let cached = self.load(&path).await?;
        if let Some(id) = find_last(&cached, target) {
            debug!("cache hit for '{}' in {}", target, path.display());
            return Ok(Some(id));
        }

        debug!("cache miss for '{}' in {}, listing remote", target, path.display());
        let entries: Vec<CacheEntry> = match kind {
            CatalogKind::Course => client
                .list_courses()
                .await?
                .into_iter()
                .map(CacheEntry::from)
                .collect(),
            CatalogKind::Topic { course_id } => client
                .list_topics(course_id)
                .await?
                .into_iter()
                .map(CacheEntry::from)
                .collect(),
        };

        let id = find_last(&entries, target);
        store::write_json(&path, &entries).await?;
        info!("rewrote {} with {} entries", path.display(), entries.len());

        if id.is_none() {
            warn!("'{}' not found remotely either", target);
        }
        Ok(id)
    }

    async fn load(&self, path: &Path) -> Result<Vec<CacheEntry>, AppError> {
        Ok(store::read_json_if_exists(path).await?.unwrap_or_default())
    }
}

// Duplicate names resolve to the last entry in iteration order.
fn find_last(entries: &[CacheEntry], target: &str) -> Option<String> {
    entries
        .iter()
        .rev()
        .find(|e| e.name == target)
        .map(|e| e.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str) -> CacheEntry {
        CacheEntry {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn last_duplicate_wins() {
        let entries = vec![entry("1", "Math"), entry("2", "Art"), entry("3", "Math")];
        assert_eq!(find_last(&entries, "Math").as_deref(), Some("3"));
        assert_eq!(find_last(&entries, "math"), None);
    }

    #[test]
    fn cache_file_names() {
        let cache = CatalogCache::new("/data");
        assert_eq!(cache.path_for(CatalogKind::Course), PathBuf::from("/data/courses.json"));
        assert_eq!(
            cache.path_for(CatalogKind::Topic { course_id: "42" }),
            PathBuf::from("/data/topics-42.json")
        );
    }
}
