//! Discover media servers and dump their content as JSON lines
//!
//! Usage: cargo run -p dlna-browser --example discover_and_browse [object_id] [recursive]
//!
//! Set `DLNA_LOG_MODE=development` to see progress on stderr.

use dlna_browser::logging::init_logging_from_env;
use dlna_browser::{BrowseEndpoint, BrowserConfig, ContentBrowser};
use dlna_discovery::{Discovery, DiscoveryConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging_from_env()?;

    let mut args = std::env::args().skip(1);
    let object_id = args.next().unwrap_or_else(|| "0".to_string());
    let recursive = args.next().as_deref() == Some("true");

    let report = Discovery::new(DiscoveryConfig::quick())?.search()?;
    eprintln!("found {} server(s)", report.servers.len());

    let browser = ContentBrowser::with_config(BrowserConfig::parallel(4))?;

    for server in &report.servers {
        let endpoint = match BrowseEndpoint::from_descriptor(server) {
            Ok(endpoint) => endpoint,
            Err(e) => {
                eprintln!("skipping {}: {}", server.usn(), e);
                continue;
            }
        };

        let items = if recursive {
            browser.browse_recursive(&endpoint, &object_id)?.items
        } else {
            browser.browse_all(&endpoint, &object_id)?.items
        };

        for item in &items {
            println!("{}", serde_json::to_string(item)?);
        }
    }

    Ok(())
}
