//! Console rendering for posts and messages. Empty results get the same
//! wording the site shows instead of an empty table.

pub mod outputformatter;

use chrono::{DateTime, Utc};

use crate::models::{Message, Post};
use outputformatter::print_table;

pub fn print_posts(posts: &[Post]) {
    if posts.is_empty() {
        println!("No posts found.");
        return;
    }
    let rows: Vec<Vec<String>> = posts
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.headline.clone(),
                p.author_username.clone().unwrap_or_default(),
                p.tag_list().join(", "),
                fmt_ts(&p.published_date),
            ]
        })
        .collect();
    print_table(&["id", "headline", "author", "tags", "published"], &rows);
    println!("posts: {}", posts.len());
}

pub fn print_messages(messages: &[Message]) {
    if messages.is_empty() {
        println!("No messages yet.");
        return;
    }
    let rows: Vec<Vec<String>> = messages
        .iter()
        .map(|m| vec![m.id.to_string(), fmt_ts(&m.timestamp), m.content.clone()])
        .collect();
    print_table(&["id", "posted", "message"], &rows);
    println!("messages: {}", messages.len());
}

pub fn print_post_detail(post: &Post) {
    println!("#{}  {}", post.id, post.headline);
    if let Some(author) = &post.author_username {
        println!("by {}", author);
    }
    println!("published {}  (updated {})", fmt_ts(&post.published_date), fmt_ts(&post.updated_date));
    let tags = post.tag_list();
    if !tags.is_empty() {
        println!("tags: {}", tags.join(", "));
    }
    match post.content.as_deref() {
        Some(body) if !body.trim().is_empty() => {
            println!();
            println!("{}", body);
        }
        _ => println!("(no content)"),
    }
}

fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}
