use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use vista_core::{AppConfig, NavBackdrop, Page, PageConfig};

#[derive(Debug, Serialize)]
struct SpyReport {
    scroll_y: f64,
    offset: f64,
    active_index: usize,
    active_id: String,
    active_label: String,
    backdrop_opacity: f64,
    backdrop_blur: f64,
    /// Blocks revealed by a viewport at this offset
    visible_blocks: Vec<String>,
}

fn report(config: &AppConfig, page_config: &PageConfig, scroll_y: f64, viewport: f64) -> Result<SpyReport> {
    let mut page = Page::build(page_config, &config.motion, viewport)?;
    let update = page.on_scroll(scroll_y, Duration::ZERO);

    let navigator = page.navigator();
    let active = &navigator.sections()[navigator.active_index()];
    let backdrop = NavBackdrop::at(scroll_y);

    Ok(SpyReport {
        scroll_y,
        offset: navigator.offset(),
        active_index: navigator.active_index(),
        active_id: active.id.clone(),
        active_label: active.label.clone(),
        backdrop_opacity: backdrop.opacity,
        backdrop_blur: backdrop.blur,
        visible_blocks: update.entered_blocks,
    })
}

pub fn run(config: &AppConfig, page_config: &PageConfig, scroll_y: f64, viewport: f64, json: bool) -> Result<()> {
    let report = report(config, page_config, scroll_y, viewport)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} ({}) at scroll {:.0}px, lookahead {:.0}px",
        report.active_label, report.active_id, report.scroll_y, report.offset
    );
    println!(
        "Navigation backdrop: opacity {:.2}, blur {:.1}px",
        report.backdrop_opacity, report.backdrop_blur
    );
    if report.visible_blocks.is_empty() {
        println!("No blocks in view");
    } else {
        println!("Blocks in view: {}", report.visible_blocks.join(", "));
    }
    Ok(())
}
