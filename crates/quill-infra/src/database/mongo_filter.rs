//! Translation of a [`BlogQuery`] into MongoDB filter and sort documents.

use bson::{Bson, DateTime, Document, doc};

use quill_core::query::BlogQuery;

/// Characters with special meaning in a MongoDB (PCRE) regular expression.
const REGEX_META: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '#', '&', '-', '~',
];

/// Escape `text` so it matches literally inside `$regex`.
pub fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if REGEX_META.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn blog_filter(query: &BlogQuery) -> Document {
    let mut filter = doc! { "user": query.user(), "category": query.category() };

    if let Some(id) = query.id() {
        filter.insert("_id", id);
    }

    if let Some(keywords) = query.keywords() {
        let pattern = escape_regex(keywords);
        filter.insert(
            "$or",
            vec![
                doc! { "title": { "$regex": pattern.clone(), "$options": "i" } },
                doc! { "description": { "$regex": pattern, "$options": "i" } },
            ],
        );
    }

    let range = query.created();
    if !range.is_unbounded() {
        let mut bounds = Document::new();
        if let Some(start) = range.start {
            bounds.insert("$gte", Bson::DateTime(DateTime::from_chrono(start)));
        }
        if let Some(end) = range.end {
            bounds.insert("$lte", Bson::DateTime(DateTime::from_chrono(end)));
        }
        filter.insert("createdAt", bounds);
    }

    filter
}

/// Ascending creation time, ties broken by id.
pub fn blog_sort() -> Document {
    doc! { "createdAt": 1, "_id": 1 }
}
