// src/wishlist.rs
//
// The family wishlist, persisted as a pretty-printed JSON array.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub region: String,
    pub town: String,
    pub notes: String,
    pub added_by: String,
    pub date_added: String,
}

#[derive(Debug)]
pub struct Wishlist {
    path: PathBuf,
    items: Vec<WishlistItem>,
}

impl Wishlist {
    /// A missing file is an empty wishlist.
    pub fn load(path: &Path) -> AppResult<Self> {
        let items = match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => Vec::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: path.to_path_buf(),
            items,
        })
    }

    pub fn save(&self) -> AppResult<()> {
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), count = self.items.len(), "wishlist saved");
        Ok(())
    }

    pub fn add(&mut self, item: WishlistItem) {
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> AppResult<WishlistItem> {
        if index >= self.items.len() {
            return Err(AppError::NotFound(format!(
                "wishlist item {index} (have {})",
                self.items.len()
            )));
        }
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }
}
