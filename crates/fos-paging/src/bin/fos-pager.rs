//! fos-pager - follow a site's "next" links the way a reader scrolling
//! to the bottom would, and print the stitched-together page.
//!
//! Usage: fos-pager <url> [content-selector] [max-pages]

use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use fos_dom::EventTarget;
use fos_html::{HtmlParser, HtmlSerializer};
use fos_layout::BlockLayout;
use fos_net::ResourceLoader;
use fos_paging::{Pager, PagingConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_PAGES: usize = 5;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        bail!("usage: fos-pager <url> [content-selector] [max-pages]");
    };
    let content_selector = args.next().unwrap_or_default();
    let max_pages = match args.next() {
        Some(n) => n.parse().context("max-pages must be a number")?,
        None => DEFAULT_MAX_PAGES,
    };

    smol::block_on(run(&url, &content_selector, max_pages))
}

async fn run(url: &str, content_selector: &str, max_pages: usize) -> Result<()> {
    let loader = ResourceLoader::new()?.with_base(url)?;
    let html = loader
        .fetch(url)
        .await
        .with_context(|| format!("cannot load {url}"))?
        .text();

    let mut doc = HtmlParser::new().parse_with_url(&html, url);
    let body = doc.body();
    if !body.is_valid() {
        bail!("{url} has no body");
    }

    let loaded = Rc::new(Cell::new(0usize));
    let counter = loaded.clone();
    let config = PagingConfig::new()
        .content_selector(content_selector)
        .debug(std::env::var_os("FOS_PAGER_DEBUG").is_some())
        .callback(move |href| {
            counter.set(counter.get() + 1);
            tracing::info!("appended {}", href);
        });

    let mut pager = Pager::new();
    pager.attach(&mut doc, body, config);

    // One ticket at a time: a short page queues its next load on completion
    while loaded.get() < max_pages && pager.is_active(body) {
        if pager.pending().next().is_none() {
            let bottom = BlockLayout::new(&doc).max_window_scroll(doc.viewport());
            doc.scroll_window_to(bottom);
            pager.dispatch_scroll(&mut doc, EventTarget::Window);
        }
        let Some(ticket) = pager.take_pending().into_iter().next() else {
            // Trigger did not fire; nothing more to do without a reader
            break;
        };

        for preload in pager.take_preloads() {
            if let Err(err) = loader.fetch(&preload.url).await {
                tracing::debug!("preload of {} failed: {}", preload.url, err);
            }
        }
        let result = loader.fetch(ticket.url()).await.map(|response| response.text());
        pager.complete(&mut doc, ticket, result);
    }

    tracing::info!(
        "{} page(s) appended, document height {}px",
        loaded.get(),
        BlockLayout::new(&doc).document_height()
    );
    pager.destroy(&mut doc, body);
    println!("{}", HtmlSerializer::new().serialize_inner(doc.tree(), body));
    Ok(())
}
