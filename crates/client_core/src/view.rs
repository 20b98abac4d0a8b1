//! Pure projections of controller snapshots into renderable views.

use shared::domain::{ArticleId, Comment, Todo};

use crate::{feed::FeedSnapshot, todo_form::TodoFormSnapshot};

pub const EMPTY_FEED_TEXT: &str = "No articles found";
pub const NO_COMMENTS_TEXT: &str = "No comments yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentsBadge {
    NoComments,
    Count(u32),
}

impl CommentsBadge {
    pub fn label(self) -> String {
        match self {
            Self::NoComments => NO_COMMENTS_TEXT.to_string(),
            Self::Count(count) => format!("{count} Comments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadView {
    /// "View comments" affordance; busy while any comment request is in
    /// flight.
    ViewButton { busy: bool },
    Loading,
    Comments(Vec<Comment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
    pub id: ArticleId,
    pub title: String,
    pub creator_name: String,
    pub badge: CommentsBadge,
    pub thread: ThreadView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedBody {
    Empty,
    List { rows: Vec<ArticleRow>, loading: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView {
    pub body: FeedBody,
    pub load_more_enabled: bool,
}

pub fn render_feed(snapshot: &FeedSnapshot) -> FeedView {
    let body = if snapshot.articles.is_empty() && !snapshot.articles_loading {
        FeedBody::Empty
    } else {
        let rows = snapshot
            .articles
            .iter()
            .map(|article| {
                let expanded = snapshot.expanded_id.as_ref() == Some(&article.id);
                let thread = if !expanded {
                    ThreadView::ViewButton {
                        busy: snapshot.comments_loading,
                    }
                } else if snapshot.comments_loading {
                    ThreadView::Loading
                } else {
                    ThreadView::Comments(snapshot.comments.clone())
                };
                ArticleRow {
                    id: article.id.clone(),
                    title: article.title.clone(),
                    creator_name: article.creator_name.clone(),
                    badge: match article.comments_count {
                        0 => CommentsBadge::NoComments,
                        count => CommentsBadge::Count(count),
                    },
                    thread,
                }
            })
            .collect();
        FeedBody::List {
            rows,
            loading: snapshot.articles_loading,
        }
    };

    FeedView {
        body,
        load_more_enabled: !snapshot.articles_loading,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoFormView {
    pub value: String,
    /// Submission failure if one is set, otherwise the validation message.
    pub error_line: Option<String>,
    pub submit_busy: bool,
    pub todos: Vec<Todo>,
}

impl TodoFormView {
    pub fn is_invalid(&self) -> bool {
        self.error_line.is_some()
    }
}

pub fn render_todo_form(snapshot: &TodoFormSnapshot) -> TodoFormView {
    let error_line = snapshot.submit_error.clone().or_else(|| {
        (!snapshot.field.validation_message.is_empty())
            .then(|| snapshot.field.validation_message.clone())
    });
    TodoFormView {
        value: snapshot.field.value.clone(),
        error_line,
        submit_busy: snapshot.submitting,
        todos: snapshot.todos.clone(),
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
