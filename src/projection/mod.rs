use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;
use url::Url;

use crate::domain::{format_created_at, Article, ArticleId, HeroImageRef};
use crate::images::{resolve_or_placeholder, ImageData, ImageResolver};
use crate::reactive::{BatchScope, Observable, ReadOnly, SubscriptionScope};
use crate::store::ArticleStore;

/// The per-field cells a card reads from.
#[derive(Clone, Default)]
struct Cells {
    title: Observable<String>,
    source: Observable<String>,
    description: Observable<String>,
    formatted_created_at: Observable<String>,
    is_favorite: Observable<bool>,
    hero_image: Observable<ImageData>,
    link: Observable<Option<Url>>,
}

impl Cells {
    fn apply(&self, article: &Article) {
        self.title.set(article.title.clone());
        self.source.set(article.source.clone());
        self.description.set(article.description.clone());
        self.formatted_created_at
            .set(format_created_at(&article.created_at));
        self.is_favorite.set(article.favorite);
        self.link.set(Some(article.link.clone()));
    }
}

/// Read/write view of one article, used by a single card.
///
/// Every field starts at a safe default (empty text, not favorite,
/// placeholder image) and follows the store's copy of the article from then
/// on. The projection borrows the store; dropping it unsubscribes.
pub struct ArticleProjection<'s> {
    store: &'s ArticleStore,
    id: ArticleId,
    cells: Cells,
    _scope: SubscriptionScope,
}

impl<'s> ArticleProjection<'s> {
    pub fn new(store: &'s ArticleStore, id: ArticleId, images: Rc<dyn ImageResolver>) -> Self {
        let cells = Cells::default();
        let mut scope = SubscriptionScope::new();

        let target = cells.clone();
        let resolved: RefCell<Option<HeroImageRef>> = RefCell::new(None);
        scope.hold(store.subscribe(move |articles| {
            let Some(article) = articles.iter().find(|a| a.id == id) else {
                return;
            };
            // Every cell holds this article before any card subscriber runs.
            let _batch = BatchScope::new();
            target.apply(article);

            if resolved.borrow().as_ref() != Some(&article.hero_image) {
                *resolved.borrow_mut() = Some(article.hero_image.clone());
                target
                    .hero_image
                    .set(resolve_or_placeholder(images.as_ref(), &article.hero_image));
            }
        }));

        Self {
            store,
            id,
            cells,
            _scope: scope,
        }
    }

    pub fn id(&self) -> ArticleId {
        self.id
    }

    /// Write the favorite flag back into the store.
    ///
    /// The candidate is built from the store's current copy, never from this
    /// projection's cells. Returns whether the store changed; setting the
    /// value it already holds is a no-op.
    pub fn set_favorite(&self, favorite: bool) -> bool {
        let Some(current) = self.store.article(self.id) else {
            trace!(id = self.id, "Article no longer in store");
            return false;
        };
        self.store.update(&current.with_favorite(favorite))
    }

    pub fn toggle_favorite(&self) -> bool {
        self.set_favorite(!self.cells.is_favorite.get())
    }

    pub fn title(&self) -> ReadOnly<String> {
        self.cells.title.read_only()
    }

    pub fn source(&self) -> ReadOnly<String> {
        self.cells.source.read_only()
    }

    pub fn description(&self) -> ReadOnly<String> {
        self.cells.description.read_only()
    }

    pub fn formatted_created_at(&self) -> ReadOnly<String> {
        self.cells.formatted_created_at.read_only()
    }

    pub fn is_favorite(&self) -> ReadOnly<bool> {
        self.cells.is_favorite.read_only()
    }

    pub fn hero_image(&self) -> ReadOnly<ImageData> {
        self.cells.hero_image.read_only()
    }

    pub fn link(&self) -> ReadOnly<Option<Url>> {
        self.cells.link.read_only()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::decoder::fixtures::images;
    use crate::domain::article::fixtures::article;
    use crate::filter::VisibilityFilter;
    use crate::images::ImageError;

    fn emissions(store: &ArticleStore) -> (Rc<Cell<usize>>, crate::reactive::Subscription) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let sub = store.subscribe(move |_| sink.set(sink.get() + 1));
        (count, sub)
    }

    #[test]
    fn test_defaults_before_any_article() {
        let store = ArticleStore::new();
        let projection = ArticleProjection::new(&store, 1, images());

        assert_eq!(projection.title().get(), "");
        assert_eq!(projection.source().get(), "");
        assert_eq!(projection.description().get(), "");
        assert_eq!(projection.formatted_created_at().get(), "");
        assert!(!projection.is_favorite().get());
        assert!(projection.hero_image().get().is_placeholder());
        assert_eq!(projection.link().get(), None);
    }

    #[test]
    fn test_fields_follow_store() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false), article(2, true)]);
        let projection = ArticleProjection::new(&store, 2, images());

        assert_eq!(projection.id(), 2);
        assert_eq!(projection.title().get(), "Article 2");
        assert_eq!(projection.source().get(), "Inc.");
        assert_eq!(projection.description().get(), "Description of article 2");
        assert_eq!(
            projection.formatted_created_at().get(),
            article(2, true).formatted_created_at()
        );
        assert!(projection.is_favorite().get());
        assert_eq!(projection.hero_image().get().bytes(), b"mcdonalds");
        assert_eq!(
            projection.link().get().map(|u| u.to_string()),
            Some("https://example.com/articles/2".to_string())
        );
    }

    #[test]
    fn test_fills_in_when_store_loads_later() {
        let store = ArticleStore::new();
        let projection = ArticleProjection::new(&store, 1, images());
        store.load(vec![article(1, true)]);

        assert_eq!(projection.title().get(), "Article 1");
        assert!(projection.is_favorite().get());
    }

    #[test]
    fn test_image_failure_yields_placeholder() {
        let store = ArticleStore::new();
        let mut a = article(1, false);
        a.hero_image = HeroImageRef::new("sodas");
        store.load(vec![a]);

        let projection = ArticleProjection::new(&store, 1, images());
        assert!(projection.hero_image().get().is_placeholder());
        assert_eq!(projection.title().get(), "Article 1");
    }

    #[test]
    fn test_image_resolved_once_per_reference() {
        struct CountingResolver(Cell<usize>);

        impl ImageResolver for CountingResolver {
            fn lookup(&self, _address: &str) -> Option<HeroImageRef> {
                None
            }

            fn resolve(&self, _image: &HeroImageRef) -> Result<ImageData, ImageError> {
                self.0.set(self.0.get() + 1);
                Ok(ImageData::Loaded(Rc::from(&b"img"[..])))
            }
        }

        let resolver = Rc::new(CountingResolver(Cell::new(0)));
        let store = ArticleStore::new();
        store.load(vec![article(1, false)]);
        let projection = ArticleProjection::new(&store, 1, resolver.clone());

        projection.set_favorite(true);
        projection.set_favorite(false);
        assert_eq!(resolver.0.get(), 1);
    }

    #[test]
    fn test_set_favorite_writes_back_once() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false), article(2, false)]);
        let projection = ArticleProjection::new(&store, 1, images());
        let (count, _sub) = emissions(&store);

        assert!(projection.set_favorite(true));

        assert_eq!(count.get(), 2);
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.iter().filter(|a| a.id == 1).count(), 1);
        assert!(snapshot[0].favorite);
        assert_eq!(snapshot[1], article(2, false));
        assert!(projection.is_favorite().get());
    }

    #[test]
    fn test_echo_of_own_value_is_noop() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false)]);
        let projection = ArticleProjection::new(&store, 1, images());
        let (count, _sub) = emissions(&store);

        projection.set_favorite(true);
        let echoed = projection.is_favorite().get();
        assert!(!projection.set_favorite(echoed));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_set_favorite_for_missing_article() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false)]);
        let projection = ArticleProjection::new(&store, 42, images());

        assert!(!projection.set_favorite(true));
        assert_eq!(store.snapshot(), vec![article(1, false)]);
    }

    #[test]
    fn test_toggle_favorite() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false)]);
        let projection = ArticleProjection::new(&store, 1, images());

        projection.toggle_favorite();
        assert!(store.article(1).unwrap().favorite);
        projection.toggle_favorite();
        assert!(!store.article(1).unwrap().favorite);
    }

    #[test]
    fn test_projections_on_same_article_converge() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false)]);
        let first = ArticleProjection::new(&store, 1, images());
        let second = ArticleProjection::new(&store, 1, images());

        first.set_favorite(true);
        assert!(first.is_favorite().get());
        assert!(second.is_favorite().get());

        second.set_favorite(false);
        assert!(!first.is_favorite().get());
        assert!(!second.is_favorite().get());
    }

    #[test]
    fn test_favorite_reaches_favorites_only_view() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false), article(2, true)]);
        let filter = VisibilityFilter::new(&store);
        filter.flip_toggle();
        let projection = ArticleProjection::new(&store, 1, images());

        projection.set_favorite(true);

        let ids: Vec<_> = filter
            .visible_articles()
            .with(|articles| articles.iter().map(|a| a.id).collect());
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_write_back_from_cell_subscriber_converges() {
        let store: &'static ArticleStore = Box::leak(Box::new(ArticleStore::new()));
        store.load(vec![article(1, false)]);
        let projection = Rc::new(ArticleProjection::new(store, 1, images()));

        let writer = Rc::downgrade(&projection);
        let _sub = projection.title().subscribe(move |title| {
            if title == "Renamed" {
                if let Some(projection) = writer.upgrade() {
                    projection.set_favorite(true);
                }
            }
        });

        let mut renamed = article(1, false);
        renamed.title = "Renamed".into();
        store.update(&renamed);

        assert!(store.article(1).unwrap().favorite);
        assert!(projection.is_favorite().get());
        assert_eq!(projection.title().get(), "Renamed");
    }

    #[test]
    fn test_cell_subscriber_sees_sibling_fields_of_same_article() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false)]);
        let projection = ArticleProjection::new(&store, 1, images());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let (sink, title, description) = (
            Rc::clone(&seen),
            projection.title(),
            projection.description(),
        );
        let _sub = projection.is_favorite().subscribe(move |&favorite| {
            sink.borrow_mut()
                .push((favorite, title.get(), description.get()));
        });

        let mut edited = article(1, true);
        edited.title = "Edited".into();
        edited.description = "Edited description".into();
        store.update(&edited);

        assert_eq!(
            seen.borrow().last().cloned(),
            Some((true, "Edited".to_string(), "Edited description".to_string()))
        );
    }

    #[test]
    fn test_drop_unsubscribes() {
        let store = ArticleStore::new();
        store.load(vec![article(1, false)]);
        let projection = ArticleProjection::new(&store, 1, images());
        let title = projection.title();
        assert_eq!(store.subscriber_count(), 1);

        drop(projection);
        assert_eq!(store.subscriber_count(), 0);

        let mut renamed = article(1, true);
        renamed.title = "Renamed".into();
        store.update(&renamed);
        assert_eq!(title.get(), "Article 1");
    }
}
