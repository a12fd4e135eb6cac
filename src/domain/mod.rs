pub mod article;

pub use article::{format_created_at, Article, ArticleId, HeroImageRef};
