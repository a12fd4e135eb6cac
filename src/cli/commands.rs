use crate::app::{AppContext, FeederError, Result};
use crate::domain::Article;
use crate::filter::VisibilityFilter;
use crate::store::ArticleStore;

pub fn list_articles(ctx: &AppContext, favorites: bool, json: bool) -> Result<()> {
    let store = ArticleStore::new();
    ctx.load_into(&store);

    let filter = VisibilityFilter::new(&store);
    if favorites {
        filter.flip_toggle();
    }
    let visible = filter.visible_articles().get();

    if json {
        let out = serde_json::to_string_pretty(&visible)
            .map_err(|e| FeederError::Other(e.to_string()))?;
        println!("{}", out);
        return Ok(());
    }

    if visible.is_empty() {
        println!("No articles");
        return Ok(());
    }

    for article in &visible {
        println!("{}", article_line(article));
    }
    Ok(())
}

pub fn check_articles(ctx: &AppContext) -> Result<()> {
    let source = ctx.source.describe();
    let articles = ctx
        .try_load_articles()?
        .ok_or_else(|| FeederError::Other(format!("Article source not found: {}", source)))?;

    let favorites = articles.iter().filter(|a| a.favorite).count();
    println!(
        "{}: {} articles ({} favorites)",
        source,
        articles.len(),
        favorites
    );
    Ok(())
}

fn article_line(article: &Article) -> String {
    let marker = if article.favorite { "★" } else { " " };
    format!(
        "{} {:>6}  {}  ({}, {})",
        marker,
        article.id,
        article.title,
        article.source,
        article.formatted_created_at()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::decoder::fixtures::{images, single_article_json};
    use crate::domain::article::fixtures::article;
    use crate::source::MemorySource;

    #[test]
    fn test_article_line() {
        let date = article(7, true).formatted_created_at();
        assert_eq!(
            article_line(&article(7, true)),
            format!("★      7  Article 7  (Inc., {})", date)
        );
        assert!(article_line(&article(7, false)).starts_with("       7"));
    }

    #[test]
    fn test_check_reports_decode_error() {
        let json = single_article_json("created_at", serde_json::json!("yesterday"));
        let ctx = AppContext::with_parts(
            Config::default(),
            images(),
            Box::new(MemorySource::new(json)),
        );

        let err = check_articles(&ctx).unwrap_err();
        assert!(matches!(err, FeederError::Decode(_)));
    }

    #[test]
    fn test_check_missing_source() {
        let ctx = AppContext::with_parts(Config::default(), images(), Box::new(MemorySource::empty()));
        assert!(matches!(check_articles(&ctx), Err(FeederError::Other(_))));
    }
}
