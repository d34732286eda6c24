use std::fmt::Write;

use super::{Region, Regions};
use crate::news::layout::{render_card, CardFragment, CategorySection};
use crate::util::sanitize::escape_markup;

const STYLE: &str = "body{font-family:sans-serif;margin:0 auto;max-width:1100px;padding:1rem}\
nav a{margin-right:1rem}\
#error{color:#b00020;min-height:1.2em}\
#quota-info{color:#666;font-size:.9em}\
#main-story img{width:100%;max-height:400px;object-fit:cover}\
#peek-stories{display:flex;gap:1rem}\
.peek-item{flex:1}.peek-item img{width:100%}\
.horizontal-scroll{display:flex;gap:1rem;overflow-x:auto}\
.story-card{min-width:220px;max-width:260px}.story-card img{width:100%}\
.story-card summary{list-style:none;cursor:pointer}";

/// Render the captured regions as a standalone page. Every provider value is
/// escaped before interpolation.
pub fn page(regions: &Regions, header: Option<&str>) -> String {
    let title = header.unwrap_or("Top Headlines");
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        escape_markup(title),
        STYLE
    );
    let _ = writeln!(out, "<header><h1>{}</h1>", escape_markup(title));
    out.push_str(&nav(regions));
    out.push_str("</header>\n");

    let _ = writeln!(
        out,
        "<div id=\"error\">{}</div>",
        regions.error.as_deref().map(escape_markup).unwrap_or_default()
    );
    if let Some(quota) = regions.quota {
        let _ = writeln!(out, "<div id=\"quota-info\">{}</div>", escape_markup(&quota.to_string()));
    }

    out.push_str(&hero(regions));
    out.push_str(&peeks(regions));
    out.push_str(&categories(regions));
    out.push_str("</body>\n</html>\n");
    out
}

fn nav(regions: &Regions) -> String {
    let Some(sections) = regions.categories.ready() else {
        return String::new();
    };
    let links: Vec<String> = sections
        .iter()
        .map(|s| {
            format!(
                "<a class=\"nav-link\" href=\"#{}\">{}</a>",
                s.category.key(),
                s.category.label()
            )
        })
        .collect();
    format!("<nav>{}</nav>\n", links.join(""))
}

fn hero(regions: &Regions) -> String {
    let body = match &regions.hero {
        Region::Ready(h) => {
            let heading = match &h.link {
                Some(link) => format!(
                    "<a href=\"{}\">{}</a>",
                    escape_markup(link),
                    escape_markup(&h.title)
                ),
                None => escape_markup(&h.title),
            };
            format!(
                "<img src=\"{}\" alt=\"{}\">\n<h1>{}</h1>\n<p>{}</p>",
                escape_markup(&h.image),
                escape_markup(&h.title),
                heading,
                escape_markup(&h.description)
            )
        }
        Region::Loading => "<div class=\"loading\">Loading top story...</div>".into(),
        Region::Unavailable => "<p>Unable to load content.</p>".into(),
        Region::Empty => String::new(),
    };
    format!("<section id=\"main-story\">\n{body}\n</section>\n")
}

fn peeks(regions: &Regions) -> String {
    let body = match &regions.peeks {
        Region::Ready(peeks) => peeks
            .iter()
            .map(|p| {
                format!(
                    "<div class=\"peek-item\"><img src=\"{}\" alt=\"{}\"><h3>{}</h3></div>",
                    escape_markup(&p.image),
                    escape_markup(&p.title),
                    escape_markup(&p.title)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Region::Loading => "<div class=\"loading\">Loading peeks...</div>".into(),
        Region::Unavailable | Region::Empty => String::new(),
    };
    format!("<section id=\"peek-stories\">\n{body}\n</section>\n")
}

fn categories(regions: &Regions) -> String {
    let body = match &regions.categories {
        Region::Ready(sections) => sections.iter().map(section).collect::<Vec<_>>().join("\n"),
        Region::Loading => "<div class=\"loading\">Loading categories...</div>".into(),
        Region::Unavailable => "<p>No news available.</p>".into(),
        Region::Empty => String::new(),
    };
    format!("<div id=\"categories-container\">\n{body}\n</div>\n")
}

// Cards are <details> elements: the summary is the collapsed card and the
// body is the expanded one.
fn section(s: &CategorySection) -> String {
    let cards: Vec<String> = s
        .articles
        .iter()
        .map(|a| {
            format!(
                "<details class=\"story-card\">\n<summary>{}</summary>\n{}\n</details>",
                fragment(&render_card(a, false)),
                fragment(&render_card(a, true))
            )
        })
        .collect();
    format!(
        "<section id=\"{}\" class=\"category-section\">\n<h2>{}</h2>\n<div class=\"horizontal-scroll\">\n{}\n</div>\n</section>",
        s.category.key(),
        s.category.label(),
        cards.join("\n")
    )
}

fn fragment(card: &CardFragment) -> String {
    match card {
        CardFragment::Collapsed {
            image,
            title,
            source,
        } => format!(
            "<img src=\"{}\" alt=\"{}\"><p>{}</p><small>{}</small>",
            escape_markup(image),
            escape_markup(title),
            escape_markup(title),
            escape_markup(source)
        ),
        // The collapsed summary above already carries the image.
        CardFragment::Expanded {
            title,
            description,
            source,
            ..
        } => format!(
            "<div class=\"content\"><h1>{}</h1><p>{}</p><small>{}</small></div>",
            escape_markup(title),
            escape_markup(description),
            escape_markup(source)
        ),
    }
}
