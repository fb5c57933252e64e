pub use quill_api_types::{
    HealthEnvelope, PostCreateRequest, PostEnvelope, PostUpdateRequest, PostView, PostsEnvelope,
    SystemInfo,
};

use crate::domain::entities::PostRecord;

impl From<PostRecord> for PostView {
    fn from(post: PostRecord) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            tags: post.tags,
            created_at: post.created_at,
        }
    }
}

pub fn posts_envelope(posts: Vec<PostRecord>) -> PostsEnvelope {
    PostsEnvelope {
        posts: posts.into_iter().map(PostView::from).collect(),
    }
}
