use anyhow::{anyhow, Result};
use console::{Key, Term};
use dialoguer::Input;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Back,
    Quit,
    Index(usize),
    /// Nothing usable was entered; show the menu again.
    Invalid,
}

/// A numbered list the user picks from, either by typing a number or with the
/// arrow keys. `sections` are item indices Tab / Shift-Tab jump between.
pub struct Menu<'a> {
    pub title: &'a str,
    pub items: &'a [String],
    pub default: Option<usize>,
    pub banner: &'a [String],
    pub sections: &'a [usize],
}

impl<'a> Menu<'a> {
    pub fn new(title: &'a str, items: &'a [String]) -> Self {
        Self {
            title,
            items,
            default: None,
            banner: &[],
            sections: &[],
        }
    }

    pub fn with_default(mut self, idx: usize) -> Self {
        self.default = Some(idx);
        self
    }

    pub fn with_banner(mut self, lines: &'a [String]) -> Self {
        self.banner = lines;
        self
    }

    pub fn with_sections(mut self, sections: &'a [usize]) -> Self {
        self.sections = sections;
        self
    }

    pub fn choose(&self) -> Result<MenuChoice> {
        let term = Term::stdout();
        let _ = term.clear_screen();
        self.print_heading();
        for (i, it) in self.items.iter().enumerate() {
            println!("{}: {}", i + 1, it);
        }
        println!("{}", self.help());

        // The first key decides between arrow navigation and typed input.
        match term.read_key()? {
            Key::ArrowUp | Key::ArrowDown | Key::Home | Key::End | Key::PageUp | Key::PageDown => {
                self.arrow_select(&term)
            }
            Key::Char('q') | Key::Char('Q') => Ok(MenuChoice::Quit),
            Key::Char('b') | Key::Char('B') | Key::Escape => Ok(MenuChoice::Back),
            Key::Enter => Ok(self.default.map_or(MenuChoice::Invalid, MenuChoice::Index)),
            Key::Char(c) if !c.is_control() => {
                let input: String = Input::new()
                    .with_prompt("Selection")
                    .allow_empty(true)
                    .with_initial_text(c.to_string())
                    .interact_text()?;
                Ok(self.typed(&input))
            }
            _ => {
                let input: String = Input::new()
                    .with_prompt("Selection")
                    .allow_empty(true)
                    .interact_text()?;
                Ok(self.typed(&input))
            }
        }
    }

    fn typed(&self, input: &str) -> MenuChoice {
        parse_selection(input, self.items.len(), self.default).unwrap_or_else(|err| {
            tracing::debug!(input, error = %err, "ignoring selection");
            MenuChoice::Invalid
        })
    }

    fn print_heading(&self) {
        for line in self.banner {
            println!("{}", line);
        }
        println!("{}", self.title);
    }

    fn help(&self) -> &'static str {
        if self.sections.is_empty() {
            "Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit."
        } else {
            "Type a number + Enter, or use arrow keys + Enter. 'b' = back, 'q' = quit. Tab = next section"
        }
    }

    fn arrow_select(&self, term: &Term) -> Result<MenuChoice> {
        let len = self.items.len();
        let last = len.saturating_sub(1);
        let mut sel = self.default.unwrap_or(0).min(last);
        let mut top: usize = 0;
        loop {
            term.clear_screen()?;
            self.print_heading();

            let (rows, _cols) = term.size();
            let reserved = 2 + self.banner.len();
            let budget = (rows as usize).saturating_sub(reserved).max(3);
            let heights: Vec<usize> = self.items.iter().map(|it| line_count(it)).collect();

            // keep selection in viewport
            let (start, end) = viewport(&heights, sel, top, budget);
            top = start;
            for i in start..end {
                let marker = if i == sel { ">" } else { " " };
                println!("{} {}: {}", marker, i + 1, self.items[i]);
            }
            println!("{}", self.help());

            let step = (end - start).saturating_sub(1).max(1);
            match term.read_key()? {
                Key::ArrowUp => sel = sel.saturating_sub(1),
                Key::ArrowDown => sel = (sel + 1).min(last),
                Key::Home => sel = 0,
                Key::End => sel = last,
                Key::PageUp => sel = sel.saturating_sub(step),
                Key::PageDown => sel = (sel + step).min(last),
                Key::Tab => {
                    if let Some(next) = next_section(self.sections, sel) {
                        sel = next.min(last);
                    }
                }
                Key::BackTab => {
                    if let Some(prev) = prev_section(self.sections, sel) {
                        sel = prev.min(last);
                    }
                }
                Key::Enter if len > 0 => return Ok(MenuChoice::Index(sel)),
                Key::Char('q') | Key::Char('Q') => return Ok(MenuChoice::Quit),
                Key::Char('b') | Key::Char('B') | Key::Escape => return Ok(MenuChoice::Back),
                _ => {}
            }
        }
    }
}

fn parse_selection(input: &str, len: usize, default: Option<usize>) -> Result<MenuChoice> {
    let s = input.trim();
    if s.is_empty() {
        return default
            .map(MenuChoice::Index)
            .ok_or_else(|| anyhow!("no selection"));
    }
    if s.eq_ignore_ascii_case("q") {
        return Ok(MenuChoice::Quit);
    }
    if s.eq_ignore_ascii_case("b") {
        return Ok(MenuChoice::Back);
    }
    let idx: usize = s.parse().map_err(|_| anyhow!("invalid selection"))?;
    if idx == 0 || idx > len {
        return Err(anyhow!("out of range"));
    }
    Ok(MenuChoice::Index(idx - 1))
}

fn line_count(label: &str) -> usize {
    label.lines().count().max(1)
}

/// Item range `[start, end)` to print so that `sel` is on screen, given the
/// printed height of each item and the rows available. Scrolls from `top` as
/// little as possible. A single item taller than `budget` is shown alone.
fn viewport(heights: &[usize], sel: usize, top: usize, budget: usize) -> (usize, usize) {
    if heights.is_empty() {
        return (0, 0);
    }
    let sel = sel.min(heights.len() - 1);
    let mut start = top.min(sel);
    while start < sel && heights[start..=sel].iter().sum::<usize>() > budget {
        start += 1;
    }
    let mut used: usize = heights[start..=sel].iter().sum();
    let mut end = sel + 1;
    while end < heights.len() && used + heights[end] <= budget {
        used += heights[end];
        end += 1;
    }
    (start, end)
}

/// First section start after `sel`, wrapping to the first section.
fn next_section(sections: &[usize], sel: usize) -> Option<usize> {
    sections
        .iter()
        .copied()
        .find(|&idx| idx > sel)
        .or_else(|| sections.first().copied())
}

/// Last section start before `sel`, wrapping to the last section.
fn prev_section(sections: &[usize], sel: usize) -> Option<usize> {
    sections
        .iter()
        .copied()
        .rev()
        .find(|&idx| idx < sel)
        .or_else(|| sections.last().copied())
}
