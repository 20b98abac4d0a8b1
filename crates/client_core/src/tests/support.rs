//! In-memory `ResourceService` whose responses are scripted per call. Gated
//! responses let a test decide when (and in which order) requests complete.

use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use async_trait::async_trait;
use shared::domain::{Article, ArticleId, Comment, CommentId, Todo, TodoId};
use tokio::sync::{oneshot, Mutex};

use crate::{ClientError, ResourceService, Result};

pub(crate) enum Scripted<T> {
    Ready(Result<T>),
    Gated(oneshot::Receiver<Result<T>>),
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T> {
        match self {
            Self::Ready(result) => result,
            Self::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ClientError::transport("gate dropped"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    ListArticles { limit: u32, offset: u32 },
    ListComments(ArticleId),
    CreateTodo(String),
}

#[derive(Default)]
pub(crate) struct ScriptedService {
    pages: Mutex<VecDeque<Scripted<Vec<Article>>>>,
    comments: Mutex<HashMap<ArticleId, VecDeque<Scripted<Vec<Comment>>>>>,
    todos: Mutex<VecDeque<Scripted<Todo>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    pub(crate) async fn push_page(&self, result: Result<Vec<Article>>) {
        self.pages.lock().await.push_back(Scripted::Ready(result));
    }

    pub(crate) async fn gate_page(&self) -> oneshot::Sender<Result<Vec<Article>>> {
        let (tx, rx) = oneshot::channel();
        self.pages.lock().await.push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) async fn push_comments(&self, article_id: &str, result: Result<Vec<Comment>>) {
        self.comments
            .lock()
            .await
            .entry(ArticleId::from(article_id))
            .or_default()
            .push_back(Scripted::Ready(result));
    }

    pub(crate) async fn gate_comments(
        &self,
        article_id: &str,
    ) -> oneshot::Sender<Result<Vec<Comment>>> {
        let (tx, rx) = oneshot::channel();
        self.comments
            .lock()
            .await
            .entry(ArticleId::from(article_id))
            .or_default()
            .push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) async fn push_todo(&self, result: Result<Todo>) {
        self.todos.lock().await.push_back(Scripted::Ready(result));
    }

    pub(crate) async fn gate_todo(&self) -> oneshot::Sender<Result<Todo>> {
        let (tx, rx) = oneshot::channel();
        self.todos.lock().await.push_back(Scripted::Gated(rx));
        tx
    }

    pub(crate) async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if self.calls.lock().await.len() >= count {
                    return;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("scripted service did not receive the expected calls");
    }
}

fn unscripted<T>(what: &str) -> Result<T> {
    Err(ClientError::transport(format!("no scripted response for {what}")))
}

#[async_trait]
impl ResourceService for ScriptedService {
    async fn list_articles(&self, limit: u32, offset: u32) -> Result<Vec<Article>> {
        self.calls
            .lock()
            .await
            .push(Call::ListArticles { limit, offset });
        let next = self.pages.lock().await.pop_front();
        match next {
            Some(scripted) => scripted.resolve().await,
            None => unscripted("list_articles"),
        }
    }

    async fn list_comments(&self, article_id: &ArticleId) -> Result<Vec<Comment>> {
        self.calls
            .lock()
            .await
            .push(Call::ListComments(article_id.clone()));
        let next = self
            .comments
            .lock()
            .await
            .get_mut(article_id)
            .and_then(VecDeque::pop_front);
        match next {
            Some(scripted) => scripted.resolve().await,
            None => unscripted("list_comments"),
        }
    }

    async fn create_todo(&self, title: &str) -> Result<Todo> {
        self.calls
            .lock()
            .await
            .push(Call::CreateTodo(title.to_string()));
        let next = self.todos.lock().await.pop_front();
        match next {
            Some(scripted) => scripted.resolve().await,
            None => unscripted("create_todo"),
        }
    }
}

pub(crate) fn article(id: &str, comments_count: u32) -> Article {
    Article {
        id: ArticleId::from(id),
        title: format!("Article {id}"),
        creator_name: format!("author-{id}"),
        comments_count,
    }
}

/// `count` articles with ids `{prefix}0..{prefix}{count-1}`.
pub(crate) fn page(prefix: &str, count: usize) -> Vec<Article> {
    (0..count)
        .map(|index| article(&format!("{prefix}{index}"), index as u32))
        .collect()
}

pub(crate) fn comment(id: &str, content: &str) -> Comment {
    Comment {
        id: CommentId::from(id),
        creator_name: format!("commenter-{id}"),
        content: content.to_string(),
    }
}

pub(crate) fn todo(id: &str, title: &str) -> Todo {
    Todo {
        id: TodoId::from(id),
        title: title.to_string(),
        completed: false,
    }
}
