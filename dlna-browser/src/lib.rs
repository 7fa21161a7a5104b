//! ContentDirectory browsing for UPnP media servers
//!
//! Builds on [`dlna_discovery`] for finding servers and [`dlna_parser`] for
//! reading responses. A [`ContentBrowser`] pages through a container's
//! children with the SOAP `Browse` action and can walk a whole subtree.
//!
//! ```rust,no_run
//! use dlna_browser::{BrowseEndpoint, ContentBrowser};
//! use dlna_discovery::search;
//!
//! let browser = ContentBrowser::new();
//! for server in search()? {
//!     let Ok(endpoint) = BrowseEndpoint::from_descriptor(&server) else {
//!         continue;
//!     };
//!     let tree = browser.browse_recursive(&endpoint, "0")?;
//!     println!("{}: {} items", server.usn(), tree.items.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod logging;
pub mod operation;

pub use client::{BrowseListing, Completeness, ContentBrowser, TreeListing};
pub use config::BrowserConfig;
pub use endpoint::BrowseEndpoint;
pub use error::{BrowseError, Result};

pub use dlna_parser::{BrowsePage, ContentItem, ParseMode};
