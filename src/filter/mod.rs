use crate::domain::Article;
use crate::reactive::{BatchScope, Observable, ReadOnly, SubscriptionScope};
use crate::store::ArticleStore;

pub const SHOW_FAVORITES_LABEL: &str = "SHOW FAVORITES";
pub const SHOW_FAVORITES_ICON: &str = "♥️";
pub const SHOW_ALL_LABEL: &str = "SHOW ALL ARTICLES";
pub const SHOW_ALL_ICON: &str = "📰";

/// Articles shown for the given toggle state, in store order.
pub fn visible_subset(articles: &[Article], favorites_only: bool) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| !favorites_only || a.favorite)
        .cloned()
        .collect()
}

/// Label of the toggle control: it names the view the toggle switches *to*.
pub fn toggle_label(favorites_only: bool) -> &'static str {
    if favorites_only {
        SHOW_ALL_LABEL
    } else {
        SHOW_FAVORITES_LABEL
    }
}

pub fn toggle_icon(favorites_only: bool) -> &'static str {
    if favorites_only {
        SHOW_ALL_ICON
    } else {
        SHOW_FAVORITES_ICON
    }
}

/// Derives the visible article list and the toggle's display strings from
/// the store and a favorites-only toggle.
///
/// The filter borrows the store it reads from, so it cannot outlive it. Its
/// derived cells are recomputed synchronously on every store emission and
/// every [`flip_toggle`](Self::flip_toggle).
pub struct VisibilityFilter<'s> {
    store: &'s ArticleStore,
    favorites_only: Observable<bool>,
    visible: Observable<Vec<Article>>,
    label: Observable<&'static str>,
    icon: Observable<&'static str>,
    _scope: SubscriptionScope,
}

impl<'s> VisibilityFilter<'s> {
    pub fn new(store: &'s ArticleStore) -> Self {
        let favorites_only = Observable::new(false);
        let visible = Observable::new(Vec::new());
        let mut scope = SubscriptionScope::new();

        let (visible_cell, toggle) = (visible.clone(), favorites_only.clone());
        scope.hold(store.subscribe(move |articles| {
            visible_cell.set(visible_subset(articles, toggle.get()));
        }));

        Self {
            store,
            favorites_only,
            visible,
            label: Observable::new(toggle_label(false)),
            icon: Observable::new(toggle_icon(false)),
            _scope: scope,
        }
    }

    /// Switch between all articles and favorites only.
    ///
    /// All four cells are written before any subscriber runs, then notified
    /// in dependency order: toggle, visible list, label, icon.
    pub fn flip_toggle(&self) {
        let on = !self.favorites_only.get();
        let _batch = BatchScope::new();
        self.favorites_only.set(on);
        self.visible
            .set(visible_subset(&self.store.snapshot(), on));
        self.label.set(toggle_label(on));
        self.icon.set(toggle_icon(on));
    }

    pub fn visible_articles(&self) -> ReadOnly<Vec<Article>> {
        self.visible.read_only()
    }

    pub fn toggle_label(&self) -> ReadOnly<&'static str> {
        self.label.read_only()
    }

    pub fn toggle_icon(&self) -> ReadOnly<&'static str> {
        self.icon.read_only()
    }
}
