pub mod html;
pub mod terminal;

use std::sync::Mutex;
use time::OffsetDateTime;

use crate::news::layout::{CategorySection, HeroView, PeekView};

/// Display capability driven by the fetcher. Methods receive shaped data and
/// decide on their own how to present it.
pub trait Renderer: Send + Sync {
    fn show_loading(&self);
    fn show_hero(&self, hero: Region<HeroView>);
    fn show_peeks(&self, peeks: Vec<PeekView>);
    fn show_categories(&self, sections: Region<Vec<CategorySection>>);
    fn show_error(&self, message: &str);
    fn clear_error(&self);
    fn show_quota(&self, quota: Quota);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Region<T> {
    Empty,
    Loading,
    Ready(T),
    Unavailable,
}

impl<T> Default for Region<T> {
    fn default() -> Self {
        Region::Empty
    }
}

impl<T> Region<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Region::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// Requests left in the provider's period, when the response reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub remaining: Option<u32>,
    pub limit: u32,
}

impl std::fmt::Display for Quota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.remaining {
            Some(n) => write!(f, "Quota left: {}/{}", n, self.limit),
            None => write!(f, "Quota left: Unknown/{}", self.limit),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Regions {
    pub hero: Region<HeroView>,
    pub peeks: Region<Vec<PeekView>>,
    pub categories: Region<Vec<CategorySection>>,
    pub error: Option<String>,
    pub quota: Option<Quota>,
    pub updated_at: Option<OffsetDateTime>,
}

/// Renderer that records the latest state of every region. The terminal
/// painter and the HTML exporter both read from a snapshot of it.
#[derive(Debug, Default)]
pub struct Surface {
    regions: Mutex<Regions>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Regions {
        self.with(|r| r.clone())
    }

    fn with<R>(&self, f: impl FnOnce(&mut Regions) -> R) -> R {
        let mut guard = match self.regions.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }

    fn touch(regions: &mut Regions) {
        regions.updated_at = Some(OffsetDateTime::now_utc());
    }
}

impl Renderer for Surface {
    fn show_loading(&self) {
        self.with(|r| {
            r.hero = Region::Loading;
            r.peeks = Region::Loading;
            r.categories = Region::Loading;
        });
    }

    fn show_hero(&self, hero: Region<HeroView>) {
        self.with(|r| {
            r.hero = hero;
            Self::touch(r);
        });
    }

    fn show_peeks(&self, peeks: Vec<PeekView>) {
        self.with(|r| r.peeks = Region::Ready(peeks));
    }

    fn show_categories(&self, sections: Region<Vec<CategorySection>>) {
        self.with(|r| {
            r.categories = sections;
            Self::touch(r);
        });
    }

    fn show_error(&self, message: &str) {
        self.with(|r| r.error = Some(message.to_string()));
    }

    fn clear_error(&self) {
        self.with(|r| r.error = None);
    }

    fn show_quota(&self, quota: Quota) {
        self.with(|r| r.quota = Some(quota));
    }
}
