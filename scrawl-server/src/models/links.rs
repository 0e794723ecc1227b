//! Hypermedia link construction
//!
//! Every link is an absolute URL derived from the inbound request's scheme
//! and host. Builders are pure functions of (base url, ids) with no side
//! effects.

use serde::Serialize;

/// A single hyperlink, optionally annotated with the HTTP method to use
#[derive(Debug, Clone, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<&'static str>,
}

impl Link {
    fn to(href: String) -> Self {
        Self { href, method: None }
    }

    fn via(method: &'static str, href: String) -> Self {
        Self {
            href,
            method: Some(method),
        }
    }
}

/// Links attached to a single user
#[derive(Debug, Clone, Serialize)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub posts: Link,
    pub update: Link,
    pub delete: Link,
}

/// Links attached to a single post
#[derive(Debug, Clone, Serialize)]
pub struct PostLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub user: Link,
    pub update: Link,
    pub delete: Link,
}

/// Top-level links on a list response. `next`/`prev` serialize as `null`
/// when the page in that direction does not exist.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_: Link,
    pub next: Option<Link>,
    pub prev: Option<Link>,
}

pub fn user_links(base: &str, user_id: i64) -> UserLinks {
    let href = format!("{base}/api/v1/users/{user_id}");
    UserLinks {
        self_: Link::to(href.clone()),
        posts: Link::to(format!("{href}/posts")),
        update: Link::via("PUT", href.clone()),
        delete: Link::via("DELETE", href),
    }
}

pub fn post_links(base: &str, user_id: i64, post_id: i64) -> PostLinks {
    let href = format!("{base}/api/v1/users/{user_id}/posts/{post_id}");
    PostLinks {
        self_: Link::to(href.clone()),
        user: Link::to(format!("{base}/api/v1/users/{user_id}")),
        update: Link::via("PUT", href.clone()),
        delete: Link::via("DELETE", href),
    }
}

pub fn collection_links(
    base: &str,
    path: &str,
    page: u32,
    limit: u32,
    total_pages: u32,
) -> CollectionLinks {
    let page_link = |p: u32| Link::to(format!("{base}{path}?page={p}&limit={limit}"));
    CollectionLinks {
        self_: page_link(page),
        next: (page < total_pages).then(|| page_link(page + 1)),
        prev: (page > 1).then(|| page_link(page - 1)),
    }
}
