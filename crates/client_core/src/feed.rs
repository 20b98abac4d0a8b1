//! Paginated article feed with single-thread comment expansion.

use std::{collections::HashSet, sync::Arc};

use shared::domain::{Article, ArticleId, Comment};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{ClientError, ClientEvent, ErrorContext, ResourceService, EVENT_CHANNEL_CAPACITY};

pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page arrived; carries the number of articles appended.
    Appended(usize),
    Failed,
    /// A page request is already in flight; nothing was issued.
    Busy,
    /// Nothing to do (feed already started, or no failed page to retry).
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    Loaded(usize),
    Failed,
    /// The expansion target changed while the request was in flight; the
    /// response was dropped.
    Stale,
}

/// Read-only view of the feed state for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub articles: Vec<Article>,
    pub offset: u32,
    pub expanded_id: Option<ArticleId>,
    pub comments: Vec<Comment>,
    pub articles_loading: bool,
    pub comments_loading: bool,
    pub can_retry: bool,
}

#[derive(Debug, Default)]
struct FeedState {
    articles: Vec<Article>,
    known_ids: HashSet<ArticleId>,
    offset: u32,
    started: bool,
    articles_loading: bool,
    last_page_failed: bool,
    expanded_id: Option<ArticleId>,
    comments: Vec<Comment>,
    comments_loading: bool,
    // Bumped on every expansion change; responses tagged with an older value
    // are discarded.
    expansion_generation: u64,
}

pub struct FeedController {
    service: Arc<dyn ResourceService>,
    page_size: u32,
    inner: Mutex<FeedState>,
    events: broadcast::Sender<ClientEvent>,
}

impl FeedController {
    pub fn new(service: Arc<dyn ResourceService>) -> Self {
        Self::with_page_size(service, PAGE_SIZE)
    }

    pub fn with_page_size(service: Arc<dyn ResourceService>, page_size: u32) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            service,
            page_size: page_size.max(1),
            inner: Mutex::new(FeedState::default()),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> FeedSnapshot {
        let guard = self.inner.lock().await;
        FeedSnapshot {
            articles: guard.articles.clone(),
            offset: guard.offset,
            expanded_id: guard.expanded_id.clone(),
            comments: guard.comments.clone(),
            articles_loading: guard.articles_loading,
            comments_loading: guard.comments_loading,
            can_retry: guard.last_page_failed && !guard.articles_loading,
        }
    }

    /// Loads the page at the initial offset. Only the first call issues a
    /// request.
    pub async fn start(&self) -> LoadOutcome {
        let offset = {
            let mut guard = self.inner.lock().await;
            if guard.started {
                return LoadOutcome::Ignored;
            }
            guard.started = true;
            guard.articles_loading = true;
            guard.offset
        };
        self.load_page(offset).await
    }

    /// Advances the offset by one page and loads it. Rejected while another
    /// page request is in flight. On a feed that has not been started yet
    /// this issues the initial page instead.
    pub async fn load_more(&self) -> LoadOutcome {
        let offset = {
            let mut guard = self.inner.lock().await;
            if guard.articles_loading {
                debug!(offset = guard.offset, "feed: load more rejected, page in flight");
                return LoadOutcome::Busy;
            }
            if guard.started {
                guard.offset = guard.offset.saturating_add(self.page_size);
            }
            guard.started = true;
            guard.articles_loading = true;
            guard.last_page_failed = false;
            guard.offset
        };
        self.load_page(offset).await
    }

    /// Re-issues the page at the current offset after a failed load.
    pub async fn retry(&self) -> LoadOutcome {
        let offset = {
            let mut guard = self.inner.lock().await;
            if guard.articles_loading {
                return LoadOutcome::Busy;
            }
            if !guard.last_page_failed {
                return LoadOutcome::Ignored;
            }
            guard.articles_loading = true;
            guard.last_page_failed = false;
            guard.offset
        };
        self.load_page(offset).await
    }

    async fn load_page(&self, offset: u32) -> LoadOutcome {
        info!(offset, limit = self.page_size, "feed: requesting article page");
        let result = self.service.list_articles(self.page_size, offset).await;

        let mut guard = self.inner.lock().await;
        guard.articles_loading = false;
        match result {
            Ok(page) => {
                let added = page.len();
                for article in page {
                    // Appended as received; the service owns id uniqueness.
                    if !guard.known_ids.insert(article.id.clone()) {
                        warn!(article_id = %article.id, offset, "feed: service returned duplicate article");
                    }
                    guard.articles.push(article);
                }
                drop(guard);
                let _ = self
                    .events
                    .send(ClientEvent::ArticlesAppended { offset, added });
                LoadOutcome::Appended(added)
            }
            Err(err) => {
                guard.last_page_failed = true;
                drop(guard);
                self.report(ErrorContext::LoadArticles, &err);
                LoadOutcome::Failed
            }
        }
    }

    /// Makes `article_id` the expanded article and loads its comments. Any
    /// previously shown comments are cleared before the request is issued.
    pub async fn expand(&self, article_id: ArticleId) -> ExpandOutcome {
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.expansion_generation += 1;
            guard.expanded_id = Some(article_id.clone());
            guard.comments.clear();
            guard.comments_loading = true;
            guard.expansion_generation
        };

        info!(article_id = %article_id, "feed: requesting comments");
        let result = self.service.list_comments(&article_id).await;

        let mut guard = self.inner.lock().await;
        if guard.expansion_generation != generation {
            debug!(
                article_id = %article_id,
                generation,
                current = guard.expansion_generation,
                "feed: discarding stale comments response"
            );
            return ExpandOutcome::Stale;
        }
        guard.comments_loading = false;
        match result {
            Ok(comments) => {
                let count = comments.len();
                guard.comments = comments;
                drop(guard);
                let _ = self
                    .events
                    .send(ClientEvent::CommentsLoaded { article_id, count });
                ExpandOutcome::Loaded(count)
            }
            Err(err) => {
                guard.comments.clear();
                drop(guard);
                self.report(ErrorContext::LoadComments, &err);
                ExpandOutcome::Failed
            }
        }
    }

    /// Returns to the state with no expanded article. Any comment request
    /// still in flight becomes stale.
    pub async fn collapse(&self) {
        let mut guard = self.inner.lock().await;
        guard.expansion_generation += 1;
        guard.expanded_id = None;
        guard.comments.clear();
        guard.comments_loading = false;
    }

    fn report(&self, context: ErrorContext, err: &ClientError) {
        error!(context = context.as_str(), error = %err, "feed: request failed");
        let _ = self.events.send(ClientEvent::Error {
            context,
            message: err.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "tests/feed_tests.rs"]
mod tests;
