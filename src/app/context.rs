use std::path::PathBuf;
use std::rc::Rc;

use tracing::{error, info, warn};

use crate::app::error::Result;
use crate::config::Config;
use crate::decoder::ArticleDecoder;
use crate::domain::Article;
use crate::images::{BundledImageResolver, ImageResolver};
use crate::source::{ArticleSource, FileSource};
use crate::store::ArticleStore;

/// Composition root: wires configuration, image resolution, decoding and the
/// article source. The [`ArticleStore`] itself is owned by the caller so that
/// filters and projections can borrow it.
pub struct AppContext {
    pub config: Config,
    pub images: Rc<dyn ImageResolver>,
    pub decoder: ArticleDecoder,
    pub source: Box<dyn ArticleSource>,
}

impl AppContext {
    /// Build from the config file (default location unless `config_path` is
    /// given); `articles_path` overrides the configured article document.
    pub fn new(config_path: Option<PathBuf>, articles_path: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Config::load_from(&path)?,
            None => Config::load()?,
        };
        if articles_path.is_some() {
            config.source.articles_path = articles_path;
        }

        let images: Rc<dyn ImageResolver> = Rc::new(BundledImageResolver::from_config(
            &config.images,
            &config.assets_dir()?,
        ));
        let source = Box::new(FileSource::new(config.articles_path()?));

        Ok(Self::with_parts(config, images, source))
    }

    pub fn with_parts(
        config: Config,
        images: Rc<dyn ImageResolver>,
        source: Box<dyn ArticleSource>,
    ) -> Self {
        let decoder = ArticleDecoder::new(images.clone());
        Self {
            config,
            images,
            decoder,
            source,
        }
    }

    /// Read and decode the whole source. `Ok(None)` when the source is absent.
    pub fn try_load_articles(&self) -> Result<Option<Vec<Article>>> {
        let Some(body) = self.source.read()? else {
            return Ok(None);
        };
        Ok(Some(self.decoder.decode_slice(&body)?))
    }

    /// Articles for the initial store fill.
    ///
    /// Never fails: an absent source or any decode error yields an empty
    /// collection, after logging the reason once.
    pub fn load_articles(&self) -> Vec<Article> {
        match self.try_load_articles() {
            Ok(Some(articles)) => {
                info!(count = articles.len(), source = %self.source.describe(), "Loaded articles");
                articles
            }
            Ok(None) => {
                warn!(source = %self.source.describe(), "Article source not found");
                Vec::new()
            }
            Err(e) => {
                error!(source = %self.source.describe(), error = %e, "Failed to load articles");
                Vec::new()
            }
        }
    }

    pub fn load_into(&self, store: &ArticleStore) {
        store.load(self.load_articles());
    }
}
