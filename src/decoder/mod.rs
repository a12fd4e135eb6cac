use std::collections::HashSet;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::domain::{Article, ArticleId};
use crate::images::ImageResolver;

/// Article record as it appears in the source JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct RawArticle {
    pub id: ArticleId,
    pub title: String,
    pub created_at: String,
    pub source: String,
    pub description: String,
    pub favorite: bool,
    pub hero_image: String,
    pub link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawArticlesResponse {
    pub articles: Vec<RawArticle>,
}

/// A record that is well-formed JSON but carries an unusable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("created_at is not an ISO-8601 timestamp")]
    InvalidCreatedAtDate,

    #[error("hero_image is not a known image address")]
    InvalidHeroImageAddress,

    #[error("link is not an absolute URL")]
    InvalidLink,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Malformed article data: {0}")]
    Structural(#[from] serde_json::Error),

    #[error("Invalid article {id}: {source}")]
    Invalid {
        id: ArticleId,
        source: ValidationError,
    },

    #[error("Duplicate article id: {0}")]
    DuplicateId(ArticleId),
}

impl DecodeError {
    /// The semantic validation failure, if this is one.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            DecodeError::Invalid { source, .. } => Some(*source),
            _ => None,
        }
    }
}

/// Turns raw article records into validated [`Article`]s.
///
/// Decoding is pure: the only collaborator is the image resolver's `lookup`,
/// which must itself be deterministic.
#[derive(Clone)]
pub struct ArticleDecoder {
    images: Rc<dyn ImageResolver>,
}

impl ArticleDecoder {
    pub fn new(images: Rc<dyn ImageResolver>) -> Self {
        Self { images }
    }

    pub fn decode_str(&self, json: &str) -> Result<Vec<Article>, DecodeError> {
        self.decode_slice(json.as_bytes())
    }

    /// Decode a whole `{"articles": [...]}` document.
    ///
    /// Fails on the first invalid record; no partial batch is ever returned.
    pub fn decode_slice(&self, body: &[u8]) -> Result<Vec<Article>, DecodeError> {
        let response: RawArticlesResponse = serde_json::from_slice(body)?;
        self.decode_batch(response.articles)
    }

    pub fn decode_batch(&self, raw: Vec<RawArticle>) -> Result<Vec<Article>, DecodeError> {
        let mut seen = HashSet::with_capacity(raw.len());
        let articles = raw
            .into_iter()
            .map(|record| {
                if !seen.insert(record.id) {
                    return Err(DecodeError::DuplicateId(record.id));
                }
                self.decode_article(record)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = articles.len(), "Decoded articles");
        Ok(articles)
    }

    pub fn decode_article(&self, raw: RawArticle) -> Result<Article, DecodeError> {
        let id = raw.id;
        self.validate(raw)
            .map_err(|source| DecodeError::Invalid { id, source })
    }

    fn validate(&self, raw: RawArticle) -> Result<Article, ValidationError> {
        let created_at = DateTime::parse_from_rfc3339(&raw.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| ValidationError::InvalidCreatedAtDate)?;

        let hero_image = self
            .images
            .lookup(&raw.hero_image)
            .ok_or(ValidationError::InvalidHeroImageAddress)?;

        let link = Url::parse(&raw.link).map_err(|_| ValidationError::InvalidLink)?;

        Ok(Article {
            id: raw.id,
            title: raw.title,
            created_at,
            source: raw.source,
            description: raw.description,
            favorite: raw.favorite,
            hero_image,
            link,
        })
    }
}
