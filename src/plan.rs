//! Story plans: the ordered page records a book is rendered from.
//!
//! Two input formats are accepted: a JSON document and a plain-text
//! "manual" layout with `Page N – title` headers.

use std::path::Path;

use crate::foundation::error::{PageError, PageResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    #[default]
    Story,
    /// Closing page; its caption sits near the top.
    End,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageRecord {
    /// Caption text drawn on the page.
    #[serde(default)]
    pub text: String,
    /// Scene description for the artwork.
    #[serde(alias = "img_prompt", alias = "image_prompt")]
    pub image_request: String,
    /// One-line visual summary, carried into the next page's prompt.
    #[serde(default, alias = "prev_syn")]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub kind: PageKind,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CoverRecord {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(alias = "img_prompt", alias = "image_prompt")]
    pub image_request: String,
}

impl CoverRecord {
    /// Title, plus the subtitle on its own line when present.
    pub fn banner_text(&self) -> String {
        match self.subtitle.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(sub) => format!("{}\n{sub}", self.title.trim()),
            None => self.title.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoryPlan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub character_lock: String,
    #[serde(default)]
    pub reminder: String,
    #[serde(default)]
    pub cover: Option<CoverRecord>,
    #[serde(default)]
    pub pages: Vec<PageRecord>,
}

impl StoryPlan {
    pub fn from_json_str(s: &str) -> PageResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| PageError::validation(format!("invalid plan JSON: {e}")))
    }

    pub fn from_json_path(path: &Path) -> PageResult<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    pub fn from_manual_path(path: &Path) -> PageResult<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::parse_manual(&s)
    }

    /// Keeps at most `n` story pages; cover and end page are unaffected.
    pub fn truncate_pages(&mut self, n: usize) {
        let mut kept = 0usize;
        self.pages.retain(|p| match p.kind {
            PageKind::End => true,
            PageKind::Story => {
                kept += 1;
                kept <= n
            }
        });
    }

    /// Parses the manual text format.
    ///
    /// ```text
    /// Cover Page – The Fox and the Moon
    /// A4 Image Prompt: A small red fox gazing at a full moon. Soft night sky.
    /// Text: The Fox and the Moon
    ///
    /// Page 1 – Waking Up
    /// A4 Image Prompt: The fox stretches outside its den
    ///   at dawn.
    /// Embedded Text: Every morning the fox said hello to the sun.
    /// ```
    ///
    /// Headers are `Cover Page`, `End Page` or `Page <n>`, then a dash and a
    /// title. Field values continue onto following lines until the next field
    /// or header. The character lock is the cover image prompt up to its first
    /// period.
    pub fn parse_manual(text: &str) -> PageResult<Self> {
        let normalized = text
            .replace(['\u{2028}', '\u{2029}'], "\n")
            .replace('\u{00A0}', " ");

        let mut sections: Vec<ManualSection> = Vec::new();
        let mut field = Field::None;

        for raw in normalized.lines() {
            let line = raw.trim();
            if let Some((header, title)) = parse_header(line) {
                sections.push(ManualSection {
                    header,
                    title,
                    image: String::new(),
                    caption: String::new(),
                });
                field = Field::None;
                continue;
            }
            let Some(cur) = sections.last_mut() else {
                continue;
            };

            if let Some(idx) = line.find("A4 Image Prompt") {
                let rest = &line[idx + "A4 Image Prompt".len()..];
                cur.image = after_colon(rest).to_string();
                field = Field::Image;
                continue;
            }
            if is_text_field(line) {
                cur.caption = after_colon(line).to_string();
                field = Field::Caption;
                continue;
            }

            if line.is_empty() {
                continue;
            }
            match field {
                Field::Image => append_words(&mut cur.image, line),
                Field::Caption => append_words(&mut cur.caption, line),
                Field::None => {}
            }
        }

        if sections.is_empty() {
            return Err(PageError::validation(
                "manual plan has no `Cover Page`, `Page N` or `End Page` headers",
            ));
        }

        let mut plan = StoryPlan::default();
        for section in sections {
            match section.header {
                Header::Cover => {
                    plan.character_lock = section
                        .image
                        .split('.')
                        .next()
                        .unwrap_or_default()
                        .trim()
                        .to_string();
                    let title = if section.title.is_empty() {
                        section.caption.clone()
                    } else {
                        section.title.clone()
                    };
                    let subtitle = Some(section.caption)
                        .filter(|c| !c.is_empty() && *c != title);
                    plan.title = title.clone();
                    plan.cover = Some(CoverRecord {
                        title,
                        subtitle,
                        image_request: section.image,
                    });
                }
                Header::Page | Header::End => {
                    plan.pages.push(PageRecord {
                        text: section.caption,
                        image_request: section.image,
                        synopsis: None,
                        title: Some(section.title).filter(|t| !t.is_empty()),
                        kind: if section.header == Header::End {
                            PageKind::End
                        } else {
                            PageKind::Story
                        },
                    });
                }
            }
        }
        Ok(plan)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Header {
    Cover,
    Page,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    None,
    Image,
    Caption,
}

struct ManualSection {
    header: Header,
    title: String,
    image: String,
    caption: String,
}

const HEADER_DASHES: &[char] = &['–', '—', '-'];

fn parse_header(line: &str) -> Option<(Header, String)> {
    let (header, rest) = if let Some(rest) = strip_prefix_ci(line, "cover page") {
        (Header::Cover, rest)
    } else if let Some(rest) = strip_prefix_ci(line, "end page") {
        (Header::End, rest)
    } else if let Some(after) = strip_prefix_ci(line, "page") {
        let tail = after.trim_start();
        if tail.len() == after.len() {
            return None;
        }
        let number = tail.trim_start_matches(|c: char| c.is_ascii_digit());
        if number.len() == tail.len() {
            return None;
        }
        (Header::Page, number)
    } else {
        return None;
    };

    // Require whitespace, a dash, whitespace; the title may be empty.
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let mut chars = rest.chars();
    let dash = chars.next()?;
    if !HEADER_DASHES.contains(&dash) {
        return None;
    }
    let title = chars.as_str();
    if !title.is_empty() && !title.starts_with(char::is_whitespace) {
        return None;
    }
    Some((header, title.trim().to_string()))
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

fn is_text_field(line: &str) -> bool {
    let Some((label, _)) = line.split_once(':') else {
        return false;
    };
    label.contains("Embedded Text")
        || label
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "Text")
}

fn after_colon(s: &str) -> &str {
    match s.split_once(':') {
        Some((_, v)) => v.trim(),
        None => s.trim(),
    }
}

fn append_words(dst: &mut String, line: &str) {
    if !dst.is_empty() {
        dst.push(' ');
    }
    dst.push_str(line);
}

#[cfg(test)]
#[path = "../tests/unit/plan.rs"]
mod tests;
