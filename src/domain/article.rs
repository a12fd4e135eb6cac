use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use url::Url;

/// Stable identity of an article within a collection.
pub type ArticleId = i64;

/// Display format for `created_at`: long month name, unpadded day, full year.
const CREATED_AT_FORMAT: &str = "%B %-d, %Y";

/// Opaque handle to a hero image, produced by an
/// [`ImageResolver`](crate::images::ImageResolver) at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HeroImageRef(String);

impl HeroImageRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeroImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated article.
///
/// Only [`ArticleDecoder`](crate::decoder::ArticleDecoder) builds these from
/// raw records, so every instance has a parsed timestamp, a known hero image
/// and an absolute link. `favorite` is the only field that changes after
/// construction; use [`Article::with_favorite`] to derive the edited value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub source: String,
    pub description: String,
    pub favorite: bool,
    pub hero_image: HeroImageRef,
    pub link: Url,
}

impl Article {
    /// Copy of this article with the favorite flag replaced.
    pub fn with_favorite(&self, favorite: bool) -> Self {
        Self {
            favorite,
            ..self.clone()
        }
    }

    /// `created_at` rendered as e.g. "June 4, 2019", in local time.
    pub fn formatted_created_at(&self) -> String {
        format_created_at(&self.created_at)
    }
}

/// Calendar date of `created_at` in the local time zone.
pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    format_created_at_in(created_at, &Local)
}

pub fn format_created_at_in<Tz: TimeZone>(created_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    created_at
        .with_timezone(tz)
        .format(CREATED_AT_FORMAT)
        .to_string()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn article(id: ArticleId, favorite: bool) -> Article {
        Article {
            id,
            title: format!("Article {}", id),
            created_at: Utc.with_ymd_and_hms(2019, 6, 4, 16, 32, 0).unwrap(),
            source: "Inc.".into(),
            description: format!("Description of article {}", id),
            favorite,
            hero_image: HeroImageRef::new("mcdonalds"),
            link: Url::parse(&format!("https://example.com/articles/{}", id)).unwrap(),
        }
    }
}
