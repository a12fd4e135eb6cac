use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::domain::{Article, ArticleId};
use crate::reactive::{Observable, Subscription};

/// The canonical, ordered article collection.
///
/// Readers either take a [`snapshot`](Self::snapshot) or
/// [`subscribe`](Self::subscribe) to receive the current collection followed
/// by every later one. The only writes are [`load`](Self::load) and
/// [`update`](Self::update).
#[derive(Debug, Default)]
pub struct ArticleStore {
    articles: Observable<Vec<Article>>,
}

impl ArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection and emit it.
    ///
    /// Ids must be unique; a repeated id keeps its first occurrence.
    pub fn load(&self, articles: Vec<Article>) {
        let mut seen = HashSet::with_capacity(articles.len());
        let articles: Vec<Article> = articles
            .into_iter()
            .filter(|a| {
                let fresh = seen.insert(a.id);
                if !fresh {
                    warn!(id = a.id, "Dropping duplicate article on load");
                }
                fresh
            })
            .collect();

        debug!(count = articles.len(), "Loading articles");
        self.articles.replace(articles);
    }

    /// Replace the stored article that has `article.id`, in place.
    ///
    /// Unknown ids and unchanged values are ignored without emitting. The
    /// unchanged-value case is what stops write-backs from looping: an echo
    /// of the value just stored never produces another emission. Returns
    /// whether the collection changed.
    pub fn update(&self, article: &Article) -> bool {
        let updated = self.articles.with(|current| {
            let index = current.iter().position(|a| a.id == article.id)?;
            if current[index] == *article {
                return None;
            }
            let mut next = current.clone();
            next[index] = article.clone();
            Some(next)
        });

        match updated {
            Some(next) => {
                debug!(id = article.id, favorite = article.favorite, "Updating article");
                self.articles.replace(next);
                true
            }
            None => {
                trace!(id = article.id, "Ignoring update: unknown id or unchanged");
                false
            }
        }
    }

    pub fn snapshot(&self) -> Vec<Article> {
        self.articles.get()
    }

    pub fn article(&self, id: ArticleId) -> Option<Article> {
        self.articles
            .with(|articles| articles.iter().find(|a| a.id == id).cloned())
    }

    pub fn len(&self) -> usize {
        self.articles.with(Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Receive the current collection now and every later one until the
    /// subscription is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&[Article]) + 'static) -> Subscription {
        self.articles
            .subscribe(move |articles| callback(articles.as_slice()))
    }

    pub fn subscriber_count(&self) -> usize {
        self.articles.subscriber_count()
    }
}
