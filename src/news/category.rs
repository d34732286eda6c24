#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Technology,
    Sports,
    Entertainment,
    Business,
}

// Declaration order is the match order: the first category with a hit wins.
const CATEGORY_SOURCES: &[(Category, &[&str])] = &[
    (
        Category::General,
        &["CNN", "BBC News", "Associated Press", "Reuters", "ABC News", "CBS News"],
    ),
    (
        Category::Technology,
        &["TechCrunch", "The Verge", "Wired", "Ars Technica", "Mashable"],
    ),
    (
        Category::Sports,
        &["ESPN", "Bleacher Report", "Sky Sports", "Fox Sports"],
    ),
    (
        Category::Entertainment,
        &["Variety", "TMZ", "Hollywood Reporter", "Billboard"],
    ),
    (
        Category::Business,
        &["Bloomberg", "Forbes", "Financial Times", "CNBC", "Wall Street Journal"],
    ),
];

impl Category {
    /// Lowercase key, used as the section anchor in exported pages.
    pub fn key(self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Technology => "technology",
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Business => "business",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Technology => "Technology",
            Category::Sports => "Sports",
            Category::Entertainment => "Entertainment",
            Category::Business => "Business",
        }
    }
}

/// Infer a topic from the publishing source's name.
pub fn classify(source_name: Option<&str>) -> Category {
    let Some(name) = source_name.filter(|n| !n.is_empty()) else {
        return Category::General;
    };
    let name = name.to_lowercase();
    CATEGORY_SOURCES
        .iter()
        .find(|(_, known)| known.iter().any(|k| name.contains(&k.to_lowercase())))
        .map(|(cat, _)| *cat)
        .unwrap_or(Category::General)
}
