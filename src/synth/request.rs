use crate::foundation::config::StyleProfile;
use crate::foundation::error::{PageError, PageResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait3x4 => "3:4",
            Self::Landscape4x3 => "4:3",
            Self::Portrait9x16 => "9:16",
            Self::Landscape16x9 => "16:9",
        }
    }

    pub fn parse(s: &str) -> PageResult<Self> {
        match s.trim() {
            "1:1" => Ok(Self::Square),
            "3:4" => Ok(Self::Portrait3x4),
            "4:3" => Ok(Self::Landscape4x3),
            "9:16" => Ok(Self::Portrait9x16),
            "16:9" => Ok(Self::Landscape16x9),
            other => Err(PageError::validation(format!(
                "unsupported aspect ratio '{other}'"
            ))),
        }
    }
}

/// One prompt as submitted to the image service.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Style fragments placed ahead of the prompt, in order.
    pub style_tags: Vec<String>,
    pub negative_constraints: String,
    pub aspect_ratio: AspectRatio,
    pub guidance_strength: Option<f32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            style_tags: Vec::new(),
            negative_constraints: String::new(),
            aspect_ratio,
            guidance_strength: None,
        }
    }

    /// Single prompt string: non-empty tags and prompt joined with `". "`,
    /// then ` --negative <constraints>` when present.
    pub fn full_text(&self) -> String {
        let mut text = self
            .style_tags
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.prompt.as_str()))
            .map(|s| s.trim().trim_end_matches('.').trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(". ");
        let negative = self.negative_constraints.trim();
        if !negative.is_empty() {
            text.push_str(" --negative ");
            text.push_str(negative);
        }
        text
    }
}

/// Derives the tiered request lists for pages and covers from one [`StyleProfile`].
///
/// Tier 1 is the full scene; tier 2 keeps the character but swaps the scene
/// for the generic subject; tier 3 is the generic subject in the art style only.
#[derive(Clone, Copy, Debug)]
pub struct PromptComposer<'a> {
    style: &'a StyleProfile,
}

impl<'a> PromptComposer<'a> {
    pub fn new(style: &'a StyleProfile) -> Self {
        Self { style }
    }

    pub fn page_tiers(&self, scene: &str, previously: Option<&str>) -> Vec<GenerationRequest> {
        let s = self.style;
        let prompt = match previously.map(str::trim).filter(|p| !p.is_empty()) {
            Some(prev) => format!("Previously: {}. {}", prev.trim_end_matches('.'), scene.trim()),
            None => scene.trim().to_string(),
        };

        let primary_prompt = [
            prompt.as_str(),
            s.reminder.as_str(),
            s.reserve_clause.as_deref().unwrap_or(""),
            s.run_tag.as_str(),
            s.no_text.as_str(),
        ]
        .iter()
        .map(|p| p.trim().trim_end_matches('.'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(". ");
        let primary = self.request(
            primary_prompt,
            vec![s.character_lock.clone(), s.art_style.clone()],
        );

        vec![
            primary,
            self.request(
                self.generic_prompt(),
                vec![s.character_lock.clone(), s.art_style.clone()],
            ),
            self.request(self.generic_prompt(), vec![s.art_style.clone()]),
        ]
    }

    pub fn cover_tiers(&self, subject: &str) -> Vec<GenerationRequest> {
        let s = self.style;
        let cover = "Front cover illustration. Blank top banner area for the title";
        let primary = self.request(
            format!("{}. {cover}. {}. {}", subject.trim().trim_end_matches('.'), s.run_tag, s.no_text),
            vec![s.character_lock.clone(), s.art_style.clone()],
        );
        let fallback = self.request(
            format!("{cover}. {}", s.no_text),
            vec![s.character_lock.clone(), s.art_style.clone()],
        );
        let generic = self.request(
            format!("{}. {cover}", s.generic_subject),
            vec![s.art_style.clone()],
        );
        vec![primary, fallback, generic]
    }

    fn generic_prompt(&self) -> String {
        format!("{}. {}", self.style.generic_subject, self.style.no_text)
    }

    fn request(&self, prompt: String, mut tags: Vec<String>) -> GenerationRequest {
        tags.retain(|t| !t.trim().is_empty());
        GenerationRequest {
            prompt,
            style_tags: tags,
            negative_constraints: self.style.negative.clone(),
            aspect_ratio: self.style.aspect_ratio,
            guidance_strength: self.style.guidance_strength,
        }
    }
}
