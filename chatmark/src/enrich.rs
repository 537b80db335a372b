//! Link enrichment: pairs every discovered URL with its page title.
//!
//! A single link is resolved inline. Two or more links are resolved by one
//! task each, and results are collected from a channel as the tasks finish,
//! so with several links the output follows completion order rather than
//! discovery order. Callers must treat link order as insignificant.
//!
//! Title failures never fail enrichment; the link is kept with an empty
//! title. That includes a resolving task that panics.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chatmark_types::Link;
use futures::FutureExt;
use tokio::sync::mpsc;

use crate::fetch::PageFetcher;
use crate::title::fetch_title;

/// Resolve one URL into a [`Link`], swallowing title errors
pub async fn resolve_link(fetcher: &dyn PageFetcher, url: String) -> Link {
    let title = match fetch_title(fetcher, &url).await {
        Ok(title) => {
            tracing::debug!("Resolved title for {}: {:?}", url, title);
            title
        }
        Err(err) => {
            tracing::warn!("Could not resolve title for {}: {}", url, err);
            String::new()
        }
    };
    Link { url, title }
}

/// Resolve titles for all `urls`
pub async fn enrich_links(fetcher: &Arc<dyn PageFetcher>, urls: Vec<String>) -> Vec<Link> {
    let count = urls.len();
    if count <= 1 {
        // Nothing to overlap with; resolve inline
        let mut links = Vec::with_capacity(count);
        for url in urls {
            links.push(resolve_link(fetcher.as_ref(), url).await);
        }
        return links;
    }

    let (tx, mut rx) = mpsc::channel(count);
    for url in urls {
        let fetcher = Arc::clone(fetcher);
        let tx = tx.clone();
        tokio::spawn(async move {
            let resolving = AssertUnwindSafe(resolve_link(fetcher.as_ref(), url.clone()));
            let link = resolving.catch_unwind().await.unwrap_or_else(|_| {
                tracing::error!("Title lookup for {} panicked", url);
                Link {
                    url,
                    title: String::new(),
                }
            });
            // The receiver outlives every sender
            let _ = tx.send(link).await;
        });
    }
    drop(tx);

    let mut links = Vec::with_capacity(count);
    while let Some(link) = rx.recv().await {
        links.push(link);
    }
    if links.len() != count {
        tracing::error!(
            "Link enrichment lost {} of {} links",
            count - links.len(),
            count
        );
    }
    links
}
