use anyhow::Result;

use wikiscroll_core::{AppConfig, ArticleFeedLoader};

/// One batch, printed; unlike the TUI, a failed fetch is an error here
pub async fn run(config: &AppConfig, json: bool) -> Result<()> {
    let loader = ArticleFeedLoader::new(config)?;
    let articles = loader.try_fetch_batch().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&articles)?);
        return Ok(());
    }

    if articles.is_empty() {
        println!("No articles returned.");
        return Ok(());
    }

    println!("Articles ({}):\n", articles.len());
    for article in &articles {
        println!("  {}", article.title());
        let preview = article.extract_preview(120);
        if !preview.is_empty() {
            println!("    {}", preview);
        }
        println!("    URL: {}", article.full_url());
        if let Some(image) = article.thumbnail() {
            println!("    Image: {}", image);
        }
        println!();
    }

    Ok(())
}
