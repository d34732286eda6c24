use console::style;
use time::macros::format_description;

use super::{Region, Regions};
use crate::news::layout::{CardFragment, CategorySection};
use crate::util::sanitize::sanitize_for_terminal;

/// Lines shown above every menu: configured header, error banner, quota.
pub fn banner_lines(regions: &Regions, header: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(h) = header {
        lines.push(h.to_string());
    }
    if let Some(err) = &regions.error {
        lines.push(style(sanitize_for_terminal(err)).red().bold().to_string());
    }
    let mut status: Vec<String> = Vec::new();
    if let Some(quota) = regions.quota {
        status.push(quota.to_string());
    }
    if let Some(at) = regions.updated_at {
        let fmt = format_description!("[hour]:[minute]:[second] UTC");
        if let Ok(stamp) = at.format(fmt) {
            status.push(format!("Updated {stamp}"));
        }
    }
    if !status.is_empty() {
        lines.push(style(status.join(" | ")).dim().to_string());
    }
    lines
}

/// Hero and peeks, the top of the page.
pub fn front_lines(regions: &Regions) -> Vec<String> {
    let mut lines = Vec::new();
    match &regions.hero {
        Region::Ready(hero) => {
            lines.push(style(sanitize_for_terminal(&hero.title)).bold().to_string());
            lines.push(sanitize_for_terminal(&hero.description));
            lines.push(style(sanitize_for_terminal(&hero.image)).dim().to_string());
        }
        Region::Loading => lines.push("Loading top story...".into()),
        Region::Unavailable => lines.push("Unable to load content.".into()),
        Region::Empty => {}
    }
    match &regions.peeks {
        Region::Ready(peeks) if !peeks.is_empty() => {
            lines.push(String::new());
            for peek in peeks {
                lines.push(format!("  > {}", sanitize_for_terminal(&peek.title)));
            }
        }
        Region::Loading => lines.push("Loading peeks...".into()),
        _ => {}
    }
    lines
}

pub fn section_heading(section: &CategorySection) -> String {
    format!(
        "== {} == ({} entries)",
        section.category.label().to_uppercase(),
        section.total
    )
}

pub fn card_label(card: &CardFragment) -> String {
    match card {
        CardFragment::Collapsed { title, source, .. } => format!(
            "  - {} {}",
            sanitize_for_terminal(title),
            style(format!("({})", sanitize_for_terminal(source))).dim()
        ),
        CardFragment::Expanded {
            title,
            description,
            source,
            image,
        } => {
            let mut label = format!("  v {}", style(sanitize_for_terminal(title)).bold());
            if !description.is_empty() {
                label.push_str(&format!("\n      {}", sanitize_for_terminal(description)));
            }
            label.push_str(&format!("\n      {}", sanitize_for_terminal(source)));
            label.push_str(&format!("\n      {}", style(sanitize_for_terminal(image)).dim()));
            label
        }
    }
}

/// Placeholder line for a category region that has no sections to list.
pub fn categories_placeholder(regions: &Regions) -> Option<&'static str> {
    match &regions.categories {
        Region::Loading => Some("Loading categories..."),
        Region::Unavailable => Some("No news available."),
        Region::Empty => Some("No headlines loaded yet."),
        Region::Ready(sections) if sections.is_empty() => Some("No headlines loaded yet."),
        Region::Ready(_) => None,
    }
}

/// Print the whole page once, for non-interactive use.
pub fn paint(regions: &Regions, header: Option<&str>) {
    for line in banner_lines(regions, header) {
        println!("{line}");
    }
    println!();
    for line in front_lines(regions) {
        println!("{line}");
    }
    println!();
    if let Some(placeholder) = categories_placeholder(regions) {
        println!("{placeholder}");
        return;
    }
    if let Some(sections) = regions.categories.ready() {
        for section in sections {
            println!("{}", style(section_heading(section)).cyan().bold());
            for article in &section.articles {
                println!("{}", card_label(&crate::news::layout::render_card(article, false)));
            }
            println!();
        }
    }
}
