pub mod category;
mod error;
mod fetch;
pub mod layout;
pub mod model;

use crate::config::RuntimeConfig;
use crate::open_url::open_url;
use crate::render::terminal::{banner_lines, card_label, categories_placeholder, front_lines, section_heading};
use crate::render::{Region, Renderer, Surface};
use crate::ui::{Menu, MenuChoice};
use anyhow::Result;
use category::Category;
use std::collections::HashSet;

pub use error::FetchError;
pub use fetch::{FetchOutcome, NewsFetcher};
pub use model::{Article, Headlines};

/// Shape `articles` and hand every region to the renderer. An empty list
/// leaves the display untouched.
pub fn render_articles(renderer: &dyn Renderer, articles: &[Article]) {
    let Some(page) = layout::shape(articles) else {
        return;
    };
    renderer.show_hero(Region::Ready(page.hero));
    renderer.show_peeks(page.peeks);
    renderer.show_categories(Region::Ready(page.categories));
}

enum Item {
    Section(Category),
    Card(Category, usize),
}

/// Browse the page held by `surface`. Cards expand in place when selected.
/// Returns `true` when the user asked to quit the app.
pub fn browse(cfg: &RuntimeConfig, surface: &Surface) -> Result<bool> {
    let mut expanded: HashSet<(Category, usize)> = HashSet::new();

    loop {
        let regions = surface.snapshot();
        let mut banner = banner_lines(&regions, cfg.header.as_deref());
        banner.push(String::new());
        banner.extend(front_lines(&regions));
        banner.push(String::new());

        let mut labels: Vec<String> = Vec::new();
        let mut items: Vec<Item> = Vec::new();
        let mut starts: Vec<usize> = Vec::new();
        if let Some(placeholder) = categories_placeholder(&regions) {
            banner.push(placeholder.to_string());
        } else if let Some(sections) = regions.categories.ready() {
            for section in sections {
                starts.push(labels.len());
                labels.push(section_heading(section));
                items.push(Item::Section(section.category));
                for (idx, article) in section.articles.iter().enumerate() {
                    let open = expanded.contains(&(section.category, idx));
                    labels.push(card_label(&layout::render_card(article, open)));
                    items.push(Item::Card(section.category, idx));
                }
            }
        }

        let choice = Menu::new(
            "Headlines (b = back, q = quit). Select a card to expand it; select a section to fold it.",
            &labels,
        )
        .with_banner(&banner)
        .with_sections(&starts)
        .choose()?;

        let idx = match choice {
            MenuChoice::Back => return Ok(false),
            MenuChoice::Quit => return Ok(true),
            MenuChoice::Invalid => continue,
            MenuChoice::Index(i) => i,
        };
        match items.get(idx) {
            Some(Item::Section(cat)) => {
                let cat = *cat;
                let before = expanded.len();
                expanded.retain(|(c, _)| *c != cat);
                if expanded.len() == before {
                    if let Some(section) = find_section(&regions.categories, cat) {
                        expanded.extend((0..section.articles.len()).map(|i| (cat, i)));
                    }
                }
            }
            Some(Item::Card(cat, card)) => {
                let key = (*cat, *card);
                if !expanded.contains(&key) {
                    expanded.insert(key);
                    continue;
                }
                let link = find_section(&regions.categories, key.0)
                    .and_then(|s| s.articles.get(key.1))
                    .and_then(|a| a.link().map(str::to_string));
                match link {
                    Some(link) => match card_menu(&banner)? {
                        CardAction::Open => {
                            if let Err(err) = open_url(&link, cfg.open_command.as_deref()) {
                                tracing::warn!(error = %format!("{err:#}"), "could not open article");
                            }
                        }
                        CardAction::Collapse => {
                            expanded.remove(&key);
                        }
                        CardAction::Stay => {}
                        CardAction::Quit => return Ok(true),
                    },
                    None => {
                        expanded.remove(&key);
                    }
                }
            }
            None => {}
        }
    }
}

enum CardAction {
    Open,
    Collapse,
    Stay,
    Quit,
}

fn card_menu(banner: &[String]) -> Result<CardAction> {
    let items = vec!["Open in browser".to_string(), "Collapse".to_string()];
    let action = match Menu::new("Card (b = back)", &items)
        .with_banner(banner)
        .with_default(0)
        .choose()?
    {
        MenuChoice::Index(0) => CardAction::Open,
        MenuChoice::Index(_) => CardAction::Collapse,
        MenuChoice::Quit => CardAction::Quit,
        MenuChoice::Back | MenuChoice::Invalid => CardAction::Stay,
    };
    Ok(action)
}

fn find_section(
    categories: &Region<Vec<layout::CategorySection>>,
    cat: Category,
) -> Option<&layout::CategorySection> {
    categories.ready()?.iter().find(|s| s.category == cat)
}
