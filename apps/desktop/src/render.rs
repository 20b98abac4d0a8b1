//! Plain-text rendering of the derived views.

use std::fmt::Write as _;

use client_core::view::{
    ArticleRow, FeedBody, FeedView, ThreadView, TodoFormView, EMPTY_FEED_TEXT,
};

pub fn feed_text(view: &FeedView) -> String {
    let mut out = String::from("Articles\n");
    match &view.body {
        FeedBody::Empty => {
            let _ = writeln!(out, "  {EMPTY_FEED_TEXT}");
        }
        FeedBody::List { rows, loading } => {
            for row in rows {
                write_row(&mut out, row);
            }
            if *loading {
                out.push_str("  (loading articles...)\n");
            }
        }
    }
    if view.load_more_enabled {
        out.push_str("[Load More]\n");
    } else {
        out.push_str("[Load More: loading]\n");
    }
    out
}

fn write_row(out: &mut String, row: &ArticleRow) {
    let _ = writeln!(
        out,
        "  [{}] {} by {} ({})",
        row.id,
        row.title,
        row.creator_name,
        row.badge.label()
    );
    match &row.thread {
        ThreadView::ViewButton { busy: false } => out.push_str("      <view comments>\n"),
        ThreadView::ViewButton { busy: true } => out.push_str("      <view comments: busy>\n"),
        ThreadView::Loading => out.push_str("      (loading comments...)\n"),
        ThreadView::Comments(comments) => {
            for comment in comments {
                let _ = writeln!(out, "      {}: {}", comment.creator_name, comment.content);
            }
        }
    }
}

pub fn todo_form_text(view: &TodoFormView) -> String {
    let mut out = String::from("Todo List Management\n");
    let _ = writeln!(out, "  Todo Title: {:?}", view.value);
    if let Some(error) = &view.error_line {
        let _ = writeln!(out, "  ! {error}");
    }
    if view.submit_busy {
        out.push_str("  [Submit: sending]\n");
    } else {
        out.push_str("  [Submit]\n");
    }
    for todo in &view.todos {
        let _ = writeln!(out, "  - [{}] {}", todo.id, todo.title);
    }
    out
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
