//! On-disk cache of spaces keyed by slug, plus slug resolution.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use common::slug::{generate_slug, nested_space_cache_key, space_cache_key};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::models::Space;
use crate::services::SpaceService;

const CACHE_FILE: &str = "spaces.json";

/// Space lookups needed to resolve a slug.
pub trait SpaceLookup {
    fn root_spaces(&self) -> Result<Vec<Space>, ClientError>;
    fn child_spaces(&self, space_id: &str) -> Result<Vec<Space>, ClientError>;
    fn space_by_id(&self, space_id: &str) -> Result<Option<Space>, ClientError>;
}

impl SpaceLookup for SpaceService<'_> {
    fn root_spaces(&self) -> Result<Vec<Space>, ClientError> {
        self.root()
    }

    fn child_spaces(&self, space_id: &str) -> Result<Vec<Space>, ClientError> {
        self.children(space_id)
    }

    fn space_by_id(&self, space_id: &str) -> Result<Option<Space>, ClientError> {
        self.get(space_id)
    }
}

/// Space JSON keyed `space_<slug>` or `space_<parent>_<child>`.
#[derive(Debug)]
pub struct SpaceCache {
    path: PathBuf,
    entries: BTreeMap<String, Space>,
}

impl SpaceCache {
    /// `<cache dir>/cardspace/spaces.json`, when the platform has a cache dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|dir| dir.join("cardspace").join(CACHE_FILE))
    }

    /// Load the cache file. A missing file is an empty cache; a corrupt one
    /// is discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding unreadable space cache");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Space> {
        self.entries.get(key)
    }

    /// Remember a space under its own slug, or under `parent_child` when a
    /// parent is given.
    pub fn remember(&mut self, space: &Space, parent: Option<&Space>) {
        let key = match parent {
            Some(parent) => nested_space_cache_key(&parent.slug(), &space.slug()),
            None => space_cache_key(&space.slug()),
        };
        self.entries.insert(key, space.clone());
    }

    /// Drop every entry that points at `space_id`.
    pub fn forget(&mut self, space_id: &str) {
        self.entries.retain(|_, space| space.space_id != space_id);
    }

    /// Drop a deleted space together with everything cached beneath it:
    /// descendants reachable through cached `parent_space_id` links, and
    /// every `space_<slug>_<child>` key nested under its slug.
    pub fn forget_tree(&mut self, space: &Space) {
        let mut gone = BTreeSet::from([space.space_id.clone()]);
        loop {
            let before = gone.len();
            for entry in self.entries.values() {
                if entry
                    .parent_space_id
                    .as_ref()
                    .is_some_and(|parent| gone.contains(parent))
                {
                    gone.insert(entry.space_id.clone());
                }
            }
            if gone.len() == before {
                break;
            }
        }

        let nested_prefix = format!("{}_", space_cache_key(&space.slug()));
        self.entries.retain(|key, entry| {
            !gone.contains(&entry.space_id) && !key.starts_with(&nested_prefix)
        });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn save(&self) -> Result<(), ClientError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    /// Find a space from a URL-style slug, optionally nested under a parent
    /// slug.
    ///
    /// Tries the cache first, then a parent/child walk from the root
    /// spaces, then treats the slug as a space id, and finally matches the
    /// slug against root space names. The first match wins and is cached.
    pub fn resolve(
        &mut self,
        lookup: &impl SpaceLookup,
        parent_slug: Option<&str>,
        slug: &str,
    ) -> Result<Option<Space>, ClientError> {
        let key = match parent_slug {
            Some(parent) => nested_space_cache_key(parent, slug),
            None => space_cache_key(slug),
        };
        if let Some(space) = self.entries.get(&key) {
            debug!(%key, "Space cache hit");
            return Ok(Some(space.clone()));
        }

        if let Some(parent_slug) = parent_slug {
            let roots = lookup.root_spaces()?;
            if let Some(parent) = roots.iter().find(|s| s.slug() == parent_slug) {
                let children = lookup.child_spaces(&parent.space_id)?;
                if let Some(child) = children.into_iter().find(|s| s.slug() == slug) {
                    self.entries.insert(key, child.clone());
                    return Ok(Some(child));
                }
            }
        }

        match lookup.space_by_id(slug) {
            Ok(Some(space)) => {
                self.entries.insert(key, space.clone());
                return Ok(Some(space));
            }
            Ok(None) => {}
            Err(e @ ClientError::Api { .. }) => {
                debug!(%slug, error = %e, "Lookup by id failed, trying names");
            }
            Err(e) => return Err(e),
        }

        let found = lookup
            .root_spaces()?
            .into_iter()
            .find(|s| generate_slug(&s.name) == slug);
        if let Some(space) = &found {
            self.entries.insert(key, space.clone());
        }
        Ok(found)
    }
}
