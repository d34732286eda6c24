use super::category::{classify, Category};
use super::model::Article;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x400?text=No+Image";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_SOURCE: &str = "Unknown";

pub const PEEK_COUNT: usize = 3;
pub const PEEK_TITLE_CHARS: usize = 30;
pub const CARD_TITLE_CHARS: usize = 50;
pub const CARDS_PER_SECTION: usize = 10;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct HeroView {
    pub title: String,
    pub description: String,
    pub image: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeekView {
    pub title: String,
    pub image: String,
}

/// One category with the articles it renders, in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySection {
    pub category: Category,
    pub articles: Vec<Article>,
    /// Number of articles in the category before the per-section cap.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardFragment {
    Collapsed {
        image: String,
        title: String,
        source: String,
    },
    Expanded {
        image: String,
        title: String,
        description: String,
        source: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub hero: HeroView,
    pub peeks: Vec<PeekView>,
    pub categories: Vec<CategorySection>,
}

/// Shape an article list into the page regions. `None` for an empty list.
pub fn shape(articles: &[Article]) -> Option<PageLayout> {
    let top = articles.first()?;
    Some(PageLayout {
        hero: hero(top),
        peeks: articles
            .iter()
            .skip(1)
            .take(PEEK_COUNT)
            .map(|a| PeekView {
                title: truncate_title(&a.title, PEEK_TITLE_CHARS),
                image: image_or_placeholder(a),
            })
            .collect(),
        categories: group(articles),
    })
}

fn hero(article: &Article) -> HeroView {
    HeroView {
        title: article.title.clone(),
        description: article.description().unwrap_or(NO_DESCRIPTION).to_string(),
        image: image_or_placeholder(article),
        link: article.link().map(str::to_string),
    }
}

/// Group by inferred category. Sections appear in the order their category is
/// first seen; each keeps at most `CARDS_PER_SECTION` articles.
pub fn group(articles: &[Article]) -> Vec<CategorySection> {
    let mut sections: Vec<CategorySection> = Vec::new();
    for article in articles {
        let category = classify(article.source_name());
        let idx = match sections.iter().position(|s| s.category == category) {
            Some(idx) => idx,
            None => {
                sections.push(CategorySection {
                    category,
                    articles: Vec::new(),
                    total: 0,
                });
                sections.len() - 1
            }
        };
        let section = &mut sections[idx];
        section.total += 1;
        if section.articles.len() < CARDS_PER_SECTION {
            section.articles.push(article.clone());
        }
    }
    sections
}

pub fn render_card(article: &Article, expanded: bool) -> CardFragment {
    let image = image_or_placeholder(article);
    let source = source_label(article).to_string();
    if expanded {
        CardFragment::Expanded {
            image,
            title: article.title.clone(),
            description: article.description().unwrap_or_default().to_string(),
            source: format!("Source: {source}"),
        }
    } else {
        CardFragment::Collapsed {
            image,
            title: truncate_title(&article.title, CARD_TITLE_CHARS),
            source,
        }
    }
}

/// Cut to `limit` characters plus an ellipsis; titles within the limit are
/// returned unchanged.
pub fn truncate_title(title: &str, limit: usize) -> String {
    match title.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &title[..cut]),
        None => title.to_string(),
    }
}

pub fn source_label(article: &Article) -> &str {
    article.source_name().unwrap_or(UNKNOWN_SOURCE)
}

fn image_or_placeholder(article: &Article) -> String {
    article.image().unwrap_or(PLACEHOLDER_IMAGE).to_string()
}
