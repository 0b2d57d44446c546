use std::time::Duration;

use anyhow::{bail, Context, Result};

use vista_core::page::Block;
use vista_core::{AppConfig, Page, PageConfig};

/// Viewport height used while sampling
const VIEWPORT_PX: f64 = 600.0;

/// First block that has something to sample over time
fn pick_block<'a>(page: &'a Page, id: Option<&str>) -> Result<&'a Block> {
    match id {
        Some(id) => page
            .block(id)
            .with_context(|| format!("No block named '{id}' on this page")),
        None => page
            .blocks()
            .iter()
            .find(|b| b.typewriter().is_some() || !b.counters().is_empty() || !b.bars().is_empty())
            .context("Page has no typewriter, counter or progress bar to sample"),
    }
}

fn sample(block: &Block, now: Duration) -> String {
    let mut parts = Vec::new();

    if let Some(typewriter) = block.typewriter() {
        let cursor = if typewriter.cursor_visible() { "▌" } else { " " };
        parts.push(format!("\"{}{}\"", typewriter.revealed_text(), cursor));
    }
    for counter in block.counters() {
        parts.push(format!("{}={}", counter.label, counter.display()));
    }
    for bar in block.bars() {
        parts.push(format!(
            "{}={:.0}%",
            bar.label,
            bar.animator.width(now) * 100.0
        ));
    }
    parts.join("  ")
}

/// Sample a block every `step_ms` from the moment it scrolls into view
pub fn timeline(
    config: &AppConfig,
    page_config: &PageConfig,
    block: Option<&str>,
    step_ms: u64,
    until_ms: u64,
) -> Result<Vec<String>> {
    if step_ms == 0 {
        bail!("--step-ms must be greater than zero");
    }

    let mut page = Page::build(page_config, &config.motion, VIEWPORT_PX)?;
    let (id, top) = {
        let target = pick_block(&page, block)?;
        (target.id().to_string(), target.bounds().top)
    };

    page.on_scroll(top.min(page.max_scroll()), Duration::ZERO);
    let target = page
        .block(&id)
        .with_context(|| format!("Block '{id}' disappeared"))?;
    if !target.has_entered() {
        bail!("Block '{id}' does not reveal when scrolled to the top of the viewport");
    }

    let mut rows = Vec::new();
    let mut elapsed = 0;
    while elapsed <= until_ms {
        let now = Duration::from_millis(elapsed);
        page.tick(now);
        if let Some(block) = page.block(&id) {
            rows.push(format!("{elapsed:>6}ms  {}", sample(block, now)));
        }
        elapsed += step_ms;
    }
    page.dispose();
    Ok(rows)
}

pub fn run(
    config: &AppConfig,
    page_config: &PageConfig,
    block: Option<&str>,
    step_ms: u64,
    until_ms: u64,
) -> Result<()> {
    for row in timeline(config, page_config, block, step_ms, until_ms)? {
        println!("{row}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_block_is_first_animated_one() {
        let config = AppConfig::default();
        let page = Page::build(&PageConfig::demo().unwrap(), &config.motion, 600.0).unwrap();
        assert_eq!(pick_block(&page, None).unwrap().id(), "about-stats");
        assert!(pick_block(&page, Some("missing")).is_err());
    }

    #[test]
    fn test_contact_status_types_out() {
        let config = AppConfig::default();
        let rows = timeline(
            &config,
            &PageConfig::demo().unwrap(),
            Some("contact-status"),
            500,
            10_000,
        )
        .unwrap();

        assert_eq!(rows.len(), 21);
        assert!(rows[0].starts_with("     0ms"));
        // Nothing is typed before the start delay
        assert!(rows[0].contains("\"▌\"") || rows[0].contains("\" \""));
        assert!(rows.last().unwrap().len() > rows[0].len());
    }

    #[test]
    fn test_zero_step_is_rejected() {
        let config = AppConfig::default();
        assert!(timeline(&config, &PageConfig::demo().unwrap(), None, 0, 100).is_err());
    }
}
