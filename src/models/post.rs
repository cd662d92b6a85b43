use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
}

impl std::fmt::Display for BlogPost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateBlogPost {
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogPost {
    pub title: Option<String>,
    /// `Some("")` clears the slug so it is derived again from the title.
    pub slug: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
}

/// A fully resolved row, slug already assigned, ready for insert.
#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub created_at: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PostFilter<'a> {
    pub published: Option<bool>,
    pub search: Option<&'a str>,
}
