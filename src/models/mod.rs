mod post;
mod project;

pub use post::*;
pub use project::*;

use serde::Serialize;

/// The two slug namespaces. Each maps onto its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    BlogPost,
    Project,
}

impl EntityKind {
    pub fn table(self) -> &'static str {
        match self {
            Self::BlogPost => "blog_posts",
            Self::Project => "projects",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlogPost => write!(f, "blog post"),
            Self::Project => write!(f, "project"),
        }
    }
}
