//! Paged and recursive Browse over one ContentDirectory endpoint.

use std::collections::HashSet;

use dlna_parser::{BrowsePage, ContentItem};
use serde::Serialize;
use soap_client::SoapClient;

use crate::config::BrowserConfig;
use crate::endpoint::BrowseEndpoint;
use crate::error::{BrowseError, Result};
use crate::operation::{BrowseFlag, BrowseOperation, BrowseRequest, ContentDirectoryOperation};

/// How the number of records received compares to the server's
/// `TotalMatches`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completeness {
    Complete,
    /// Paging stopped before the declared total was reached.
    Incomplete { received: usize, declared: u32 },
    /// More records arrived than the server declared.
    Overfull { received: usize, declared: u32 },
}

impl Completeness {
    pub fn assess(received: usize, declared: u32) -> Self {
        let expected = declared as usize;
        if received < expected {
            Completeness::Incomplete { received, declared }
        } else if received > expected {
            Completeness::Overfull { received, declared }
        } else {
            Completeness::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Completeness::Complete)
    }
}

/// Every child of one container, gathered over as many pages as it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseListing {
    pub items: Vec<ContentItem>,
    /// `TotalMatches` from the last page received.
    pub declared_total: u32,
    /// Browse requests issued.
    pub pages: usize,
    pub completeness: Completeness,
}

/// Result of a recursive walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeListing {
    /// Parent records before their children, siblings in server order.
    pub items: Vec<ContentItem>,
    /// Containers listed, the starting object included.
    pub containers: usize,
    /// Containers whose listing did not match their declared total.
    pub partial: Vec<(String, Completeness)>,
    /// Containers below the starting object whose listing failed; their
    /// subtrees are missing.
    pub failed: Vec<(String, BrowseError)>,
    /// Containers reached a second time and not browsed again.
    pub skipped_repeats: usize,
    /// Containers below the depth limit and not browsed.
    pub skipped_depth: usize,
}

impl TreeListing {
    pub fn is_complete(&self) -> bool {
        self.partial.is_empty() && self.failed.is_empty() && self.skipped_depth == 0
    }
}

#[derive(Debug)]
struct PendingContainer {
    id: String,
    depth: usize,
}

/// Client for the ContentDirectory `Browse` action.
///
/// # Examples
///
/// ```rust,no_run
/// use dlna_browser::{BrowseEndpoint, ContentBrowser};
///
/// let browser = ContentBrowser::new();
/// let endpoint = BrowseEndpoint::new(
///     "http://192.168.1.20:8200/ctl/ContentDir",
///     "urn:schemas-upnp-org:service:ContentDirectory:1",
/// );
///
/// let listing = browser.browse_all(&endpoint, "0")?;
/// for item in &listing.items {
///     println!("{:?} {:?}", item.id(), item.title());
/// }
/// # Ok::<(), dlna_browser::BrowseError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ContentBrowser {
    soap_client: SoapClient,
    config: BrowserConfig,
}

impl ContentBrowser {
    /// Browser with the default configuration and SOAP timeouts.
    pub fn new() -> Self {
        Self {
            soap_client: SoapClient::new(),
            config: BrowserConfig::default(),
        }
    }

    pub fn with_config(config: BrowserConfig) -> Result<Self> {
        Self::with_soap_client(SoapClient::new(), config)
    }

    pub fn with_soap_client(soap_client: SoapClient, config: BrowserConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { soap_client, config })
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    fn execute<Op: ContentDirectoryOperation>(
        &self,
        endpoint: &BrowseEndpoint,
        request: &Op::Request,
    ) -> Result<Op::Response> {
        let payload = Op::build_payload(request);
        let xml = self.soap_client.call(
            &endpoint.control_url,
            &endpoint.service_type,
            Op::ACTION,
            &payload,
        )?;
        Op::parse_response(&xml, self.config.parse_mode)
    }

    /// One Browse request for the children of `object_id`.
    ///
    /// A non-200 answer fails the page; nothing partial is returned.
    pub fn browse_page(
        &self,
        endpoint: &BrowseEndpoint,
        object_id: &str,
        start_index: u32,
    ) -> Result<BrowsePage> {
        let page = self.execute::<BrowseOperation>(endpoint, &BrowseRequest::children(object_id, start_index))?;

        tracing::debug!(
            object_id,
            start_index,
            returned = page.returned,
            total = page.total,
            parsed = page.items.len(),
            "browse page"
        );
        if page.count_mismatch() {
            tracing::debug!(object_id, "NumberReturned differs from records parsed");
        }
        Ok(page)
    }

    /// The record of `object_id` itself rather than its children.
    pub fn browse_metadata(&self, endpoint: &BrowseEndpoint, object_id: &str) -> Result<Option<ContentItem>> {
        let request = BrowseRequest {
            browse_flag: BrowseFlag::Metadata,
            ..BrowseRequest::children(object_id, 0)
        };
        let page = self.execute::<BrowseOperation>(endpoint, &request)?;
        Ok(page.items.into_iter().next())
    }

    /// All children of `object_id`, paging until the declared total is
    /// reached or a page comes back empty.
    ///
    /// A short or long listing is still returned; its
    /// [`Completeness`] says how it compares to the server's total.
    pub fn browse_all(&self, endpoint: &BrowseEndpoint, object_id: &str) -> Result<BrowseListing> {
        let mut items = Vec::new();
        let mut start_index = 0u32;
        let mut pages = 0;

        let declared_total = loop {
            let page = self.browse_page(endpoint, object_id, start_index)?;
            pages += 1;

            let exhausted = page.returned == 0 || page.items.is_empty();
            start_index = start_index.saturating_add(page.returned);
            items.extend(page.items);
            if exhausted || start_index >= page.total {
                break page.total;
            }
        };

        let completeness = Completeness::assess(items.len(), declared_total);
        match completeness {
            Completeness::Complete => {}
            Completeness::Incomplete { received, declared } => {
                tracing::warn!(object_id, received, declared, "could not get all items");
            }
            Completeness::Overfull { received, declared } => {
                tracing::warn!(object_id, received, declared, "server returned more items than it declared");
            }
        }

        Ok(BrowseListing { items, declared_total, pages, completeness })
    }

    /// Walk the tree under `object_id`.
    ///
    /// Containers are visited from an explicit worklist. With cycle detection
    /// on, an object id is browsed at most once; with a depth limit,
    /// containers deeper than the limit are counted but not browsed. When
    /// `concurrency` is above one, that many containers are fetched at a time.
    ///
    /// Only a failure on `object_id` itself is returned as an error. A failure
    /// on a container below it is recorded in [`TreeListing::failed`] and the
    /// walk goes on with the remaining containers.
    pub fn browse_recursive(&self, endpoint: &BrowseEndpoint, object_id: &str) -> Result<TreeListing> {
        let mut tree = TreeListing::default();
        let mut visited = HashSet::new();
        if self.config.detect_cycles {
            visited.insert(object_id.to_string());
        }

        let mut worklist = vec![PendingContainer { id: object_id.to_string(), depth: 0 }];

        while !worklist.is_empty() {
            let take = self.config.concurrency.min(worklist.len());
            let batch: Vec<PendingContainer> = (0..take).filter_map(|_| worklist.pop()).collect();
            let results = self.fetch_batch(endpoint, &batch);

            let mut discovered = Vec::with_capacity(batch.len());
            for (parent, result) in batch.iter().zip(results) {
                let listing = match result {
                    Ok(listing) => listing,
                    Err(e) if parent.depth == 0 => return Err(e),
                    Err(e) => {
                        tracing::warn!(id = %parent.id, error = %e, "container listing failed, subtree skipped");
                        tree.failed.push((parent.id.clone(), e));
                        continue;
                    }
                };
                tree.containers += 1;
                if !listing.completeness.is_complete() {
                    tree.partial.push((parent.id.clone(), listing.completeness));
                }

                let mut children = Vec::new();
                for item in listing.items {
                    if !item.is_container() {
                        tree.items.push(item);
                        continue;
                    }
                    if let Some(child) = self.admit(&item, parent.depth + 1, &mut visited, &mut tree) {
                        children.push(child);
                    }
                    if self.config.include_containers {
                        tree.items.push(item);
                    }
                }
                discovered.push(children);
            }

            // Last pushed is popped first: keep the first parent's first
            // child on top.
            for children in discovered.into_iter().rev() {
                worklist.extend(children.into_iter().rev());
            }
        }

        tracing::debug!(
            object_id,
            containers = tree.containers,
            items = tree.items.len(),
            failed = tree.failed.len(),
            "recursive browse finished"
        );
        Ok(tree)
    }

    fn admit(
        &self,
        container: &ContentItem,
        depth: usize,
        visited: &mut HashSet<String>,
        tree: &mut TreeListing,
    ) -> Option<PendingContainer> {
        let Some(id) = container.id() else {
            tracing::debug!("container without id skipped");
            return None;
        };

        if self.config.max_depth.map_or(false, |max| depth > max) {
            tracing::debug!(id, depth, "container below depth limit skipped");
            tree.skipped_depth += 1;
            return None;
        }

        if self.config.detect_cycles && !visited.insert(id.to_string()) {
            tracing::warn!(id, "container reached twice, not browsed again");
            tree.skipped_repeats += 1;
            return None;
        }

        Some(PendingContainer { id: id.to_string(), depth })
    }

    fn fetch_batch(&self, endpoint: &BrowseEndpoint, batch: &[PendingContainer]) -> Vec<Result<BrowseListing>> {
        if batch.len() <= 1 {
            return batch.iter().map(|pending| self.browse_all(endpoint, &pending.id)).collect();
        }

        std::thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|pending| scope.spawn(move || self.browse_all(endpoint, &pending.id)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        })
    }
}

impl Default for ContentBrowser {
    fn default() -> Self {
        Self::new()
    }
}
