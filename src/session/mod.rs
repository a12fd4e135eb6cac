pub mod action;

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use tracing::debug;

use crate::app::{AppContext, Result};
use crate::filter::VisibilityFilter;
use crate::images::ImageResolver;
use crate::projection::ArticleProjection;
use crate::store::ArticleStore;

pub use self::action::Action;

const HELP: &str = "t: toggle favorites  f <n>: favorite  o <n>: open link  l: list  q: quit";

/// Interactive reader state: the filter plus one projection per visible card.
pub struct Session<'s> {
    store: &'s ArticleStore,
    images: Rc<dyn ImageResolver>,
    filter: VisibilityFilter<'s>,
    cards: Vec<ArticleProjection<'s>>,
    opener: fn(&str) -> io::Result<()>,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl<'s> Session<'s> {
    pub fn new(store: &'s ArticleStore, images: Rc<dyn ImageResolver>) -> Self {
        let mut session = Self {
            store,
            images,
            filter: VisibilityFilter::new(store),
            cards: Vec::new(),
            opener: |url| open::that(url),
            should_quit: false,
            status_message: None,
        };
        session.reconcile_cards();
        session
    }

    pub fn cards(&self) -> &[ArticleProjection<'s>] {
        &self.cards
    }

    pub fn handle(&mut self, action: Action) -> Result<()> {
        self.status_message = None;

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::ToggleFilter => {
                self.filter.flip_toggle();
            }
            Action::ToggleFavorite(n) => match self.card(n) {
                Some(card) => {
                    card.toggle_favorite();
                }
                None => self.set_status(format!("No article {}", n)),
            },
            Action::OpenLink(n) => {
                let link = self.card(n).and_then(|card| card.link().get());
                match link {
                    Some(url) => match (self.opener)(url.as_str()) {
                        Ok(()) => self.set_status(format!("Opened {}", url)),
                        Err(e) => self.set_status(format!("Failed to open browser: {}", e)),
                    },
                    None => self.set_status(format!("No article {}", n)),
                }
            }
            Action::Refresh => {}
            Action::None => {
                self.set_status(format!("Unknown command. {}", HELP));
            }
        }

        self.reconcile_cards();
        Ok(())
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "{}  {}",
            self.filter.toggle_icon().get(),
            self.filter.toggle_label().get()
        )?;
        writeln!(out)?;

        if self.cards.is_empty() {
            writeln!(out, "  (no articles)")?;
        }

        for (index, card) in self.cards.iter().enumerate() {
            let marker = if card.is_favorite().get() { "★" } else { "☆" };
            let image = if card.hero_image().get().is_placeholder() {
                "no image"
            } else {
                "image"
            };
            writeln!(out, "[{}] {} {}", index + 1, marker, card.title().get())?;
            writeln!(
                out,
                "    {} · {} · [{}]",
                card.source().get(),
                card.formatted_created_at().get(),
                image
            )?;
            writeln!(out, "    {}", card.description().get())?;
        }

        writeln!(out)?;
        if let Some(status) = &self.status_message {
            writeln!(out, "{}", status)?;
        }
        Ok(())
    }

    fn card(&self, n: usize) -> Option<&ArticleProjection<'s>> {
        n.checked_sub(1).and_then(|index| self.cards.get(index))
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Line the cards up with the visible articles. Cards whose article is no
    /// longer visible are dropped, which unsubscribes them from the store.
    fn reconcile_cards(&mut self) {
        let mut previous: HashMap<_, _> = self
            .cards
            .drain(..)
            .map(|card| (card.id(), card))
            .collect();

        let visible = self.filter.visible_articles().get();
        self.cards = visible
            .iter()
            .map(|article| {
                previous.remove(&article.id).unwrap_or_else(|| {
                    ArticleProjection::new(self.store, article.id, self.images.clone())
                })
            })
            .collect();

        debug!(
            cards = self.cards.len(),
            released = previous.len(),
            "Reconciled cards"
        );
    }
}

/// Run the interactive reader on stdin/stdout until `q` or end of input.
pub fn run(ctx: &AppContext) -> Result<()> {
    let store = ArticleStore::new();
    ctx.load_into(&store);

    let mut session = Session::new(&store, ctx.images.clone());
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    writeln!(stdout, "{}", HELP)?;
    while !session.should_quit {
        session.render(&mut stdout)?;
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        session.handle(Action::from(line.as_str()))?;
    }

    Ok(())
}
