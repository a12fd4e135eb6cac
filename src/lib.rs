//! # Feeder
//!
//! A single-screen article reader: load a fixed article set, mark favorites,
//! and filter the view by that flag.
//!
//! ## Architecture
//!
//! Feeder is a small synchronous dataflow:
//!
//! ```text
//! Source → Decoder → Store → VisibilityFilter → ArticleProjection (per card)
//!                      ↑                                 │
//!                      └──────── set_favorite ───────────┘
//! ```
//!
//! Every write reaches all dependents, in that order, before the call that
//! made it returns. The store ignores writes that would not change anything,
//! which is what keeps card write-backs from echoing forever.
//!
//! ## Quick Start
//!
//! ```bash
//! # Validate the article document
//! feeder check --articles articles.json
//!
//! # List favorites
//! feeder list --favorites
//!
//! # Interactive reader
//! feeder read
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// image resolution, decoding and the article source.
pub mod app;

/// Command-line interface using clap.
///
/// - `list [--favorites] [--json]` - Print the visible articles
/// - `check` - Validate the article document
/// - `read` - Launch the interactive reader
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/feeder/config.toml`, supporting:
/// - The article document location
/// - The hero image table and asset directory
pub mod config;

/// Raw record decoding and validation.
///
/// - [`ArticleDecoder`](decoder::ArticleDecoder): JSON → validated articles
/// - [`ValidationError`](decoder::ValidationError): the semantic failures
pub mod decoder;

/// Core domain models.
///
/// - [`Article`](domain::Article): validated article with a mutable favorite flag
/// - [`HeroImageRef`](domain::HeroImageRef): resolved hero image handle
pub mod domain;

/// Derives the visible articles and toggle display strings.
pub mod filter;

/// Hero image resolution behind the [`ImageResolver`](images::ImageResolver)
/// capability.
pub mod images;

/// Per-card read/write view of one article.
pub mod projection;

/// Observable cells and subscriptions.
pub mod reactive;

/// Line-driven interactive reader.
pub mod session;

/// Where the article document is read from.
pub mod source;

/// The canonical article collection.
pub mod store;
