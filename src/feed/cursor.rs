use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Decision;
use crate::catalog::{Catalog, CatalogItem, CatalogResult, MovieList};
use crate::db::{FavoriteRecord, FavoritesRepo, OwnerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeedState {
    /// Nothing fetched yet.
    Unloaded,
    /// There is a current item.
    Showing,
    /// The catalog had nothing to show at all.
    NoItems,
    /// Every item was shown and upstream has no further pages.
    Exhausted,
    /// The last page fetch failed. Advancing again retries it.
    Failed,
}

/// Walks a catalog list one movie at a time, fetching pages as the local
/// window runs out. Only the current page is kept.
pub struct FeedCursor {
    catalog: Arc<dyn Catalog>,
    favorites: Arc<dyn FavoritesRepo>,
    owner: OwnerId,
    list: MovieList,
    items: Vec<CatalogItem>,
    index: usize,
    // Last page fetched, 0 before the first successful fetch.
    page: u32,
    total_pages: u32,
    // Items on pages before the current one.
    consumed: usize,
    shown_any: bool,
    state: FeedState,
}

impl FeedCursor {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        favorites: Arc<dyn FavoritesRepo>,
        owner: OwnerId,
        list: MovieList,
    ) -> Self {
        Self {
            catalog,
            favorites,
            owner,
            list,
            items: Vec::new(),
            index: 0,
            page: 0,
            total_pages: 1,
            consumed: 0,
            shown_any: false,
            state: FeedState::Unloaded,
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn list(&self) -> MovieList {
        self.list
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Position of the current item in the whole feed, counting from 0.
    pub fn position(&self) -> usize {
        self.consumed + self.index
    }

    /// Items still buffered after the current one.
    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.index + 1)
    }

    pub fn has_more_pages(&self) -> bool {
        self.page == 0 || self.page < self.total_pages
    }

    pub fn current(&self) -> Option<&CatalogItem> {
        self.items.get(self.index)
    }

    /// Move to the next item, fetching the next page if the buffer is used up.
    /// Returns `None` once the feed has nothing more to show; `state()` tells
    /// an empty catalog apart from an exhausted one.
    pub async fn advance(&mut self) -> CatalogResult<Option<&CatalogItem>> {
        if matches!(self.state, FeedState::NoItems | FeedState::Exhausted) {
            return Ok(None);
        }

        if self.index + 1 < self.items.len() {
            self.index += 1;
            self.state = FeedState::Showing;
            return Ok(self.items.get(self.index));
        }

        self.refill().await
    }

    async fn refill(&mut self) -> CatalogResult<Option<&CatalogItem>> {
        while self.has_more_pages() {
            let next = self.page + 1;
            debug!(list = self.list.as_str(), page = next, "fetching feed page");

            let page = match self.catalog.fetch_page(self.list, next).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to fetch page {} of {}: {}", next, self.list.as_str(), e);
                    self.state = FeedState::Failed;
                    return Err(e);
                }
            };

            self.page = next;
            self.total_pages = page.total_pages.max(1);

            // An empty page leaves the buffer alone, so a failed fetch
            // after it still has the current item to show.
            if page.items.is_empty() {
                debug!(page = next, "feed page was empty");
                continue;
            }

            self.consumed += self.items.len();
            self.items = page.items;
            self.index = 0;
            self.shown_any = true;
            self.state = FeedState::Showing;
            return Ok(self.items.first());
        }

        self.consumed += self.items.len();
        self.items.clear();
        self.index = 0;
        self.state = if self.shown_any {
            info!(list = self.list.as_str(), shown = self.consumed, "feed exhausted");
            FeedState::Exhausted
        } else {
            info!(list = self.list.as_str(), "no items found");
            FeedState::NoItems
        };
        Ok(None)
    }

    /// Apply a decision to the current item and move on. A like is stored
    /// first, but a storage failure only gets logged: the feed advances
    /// either way.
    pub async fn record_decision(
        &mut self,
        decision: Decision,
    ) -> CatalogResult<Option<&CatalogItem>> {
        if decision == Decision::Like {
            if let Some(item) = self.current() {
                let record = FavoriteRecord::from_item(self.owner, item);
                match self.favorites.put(self.owner, &record).await {
                    Ok(()) => debug!(item = record.item_id, "liked"),
                    Err(e) => warn!("Failed to save favorite {}: {}", record.item_id, e),
                }
            }
        }

        self.advance().await
    }

    /// Drop everything and start again from the first page.
    pub fn restart(&mut self) {
        self.items.clear();
        self.index = 0;
        self.page = 0;
        self.total_pages = 1;
        self.consumed = 0;
        self.shown_any = false;
        self.state = FeedState::Unloaded;
    }
}
