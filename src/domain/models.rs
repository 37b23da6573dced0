use serde::{Deserialize, Serialize};

/// A blog post as stored and as returned to clients.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub author_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i32,
}

/// Fields of a post to overwrite. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePostInput {
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl UpdatePostInput {
    pub fn into_parts(self) -> (i32, PostChanges) {
        (
            self.id,
            PostChanges {
                title: self.title,
                content: self.content,
            },
        )
    }
}
