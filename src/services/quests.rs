// src/services/quests.rs

//! Questboard fetcher service.
//!
//! Fetches a community's questboard page and extracts quest elements using
//! the configured CSS selectors.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Config, FetcherConfig, Item};
use crate::utils::{http, resolve_url, truncate_chars};

/// Anything that can list the current quests of a tracked source.
#[async_trait]
pub trait QuestSource: Send + Sync {
    /// Current items of `source`.
    ///
    /// Failures are soft: they are logged and reported as an empty list.
    async fn fetch(&self, source: &str) -> Vec<Item>;
}

/// Service scraping public questboard pages.
pub struct QuestboardFetcher {
    config: Arc<Config>,
    client: Client,
}

impl QuestboardFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = http::create_page_client(&config.fetcher)?;
        Ok(Self { config, client })
    }

    /// Fetch and parse one questboard, surfacing every failure.
    pub async fn try_fetch(&self, source: &str) -> Result<Vec<Item>> {
        let page_url = self.config.fetcher.page_url(source);
        let html = http::fetch_text(&self.client, &page_url)
            .await
            .map_err(|e| AppError::fetch(source, e))?;
        parse_questboard(&html, &page_url, &self.config.fetcher)
    }
}

#[async_trait]
impl QuestSource for QuestboardFetcher {
    async fn fetch(&self, source: &str) -> Vec<Item> {
        match self.try_fetch(source).await {
            Ok(items) => {
                if items.is_empty() {
                    log::debug!("[{}] No quest elements found", source);
                }
                items
            }
            Err(e) => {
                log::warn!("[{}] Error fetching quests: {}", source, e);
                Vec::new()
            }
        }
    }
}

/// Extract quest items from a questboard document.
pub fn parse_questboard(html: &str, page_url: &str, config: &FetcherConfig) -> Result<Vec<Item>> {
    let document = Html::parse_document(html);
    let item_sel = parse_selector(&config.item_selector)?;
    let link_sel = config
        .link_selector
        .as_deref()
        .map(parse_selector)
        .transpose()?;
    let base_url = Url::parse(page_url).ok();

    let items = document
        .select(&item_sel)
        .map(|element| {
            let link = link_sel
                .as_ref()
                .and_then(|sel| element.select(sel).next())
                .and_then(|a| a.value().attr("href"))
                .map(|href| match &base_url {
                    Some(base) => resolve_url(base, href),
                    None => href.to_string(),
                })
                .unwrap_or_else(|| page_url.to_string());

            Item {
                id: element.value().attr(&config.id_attr).map(String::from),
                title: visible_text(&element, config.title_max_chars),
                url: link,
            }
        })
        .collect();

    Ok(items)
}

/// Trimmed text fragments of an element joined by spaces, truncated.
fn visible_text(element: &ElementRef, max_chars: usize) -> String {
    let text = element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&text, max_chars).to_string()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
