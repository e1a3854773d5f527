//! Text transformations behind `/api/text`.

use serde::Serialize;
use thiserror::Error;

use crate::constants::limits::WORDS_PER_MINUTE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextError {
    #[error("Text cannot be empty")]
    Empty,

    #[error("Unknown text operation: {0}")]
    UnknownOperation(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOperation {
    Uppercase,
    Lowercase,
    Reverse,
    TitleCase,
    RemoveSpaces,
    Slugify,
}

impl TextOperation {
    pub const ALL: [Self; 6] = [
        Self::Uppercase,
        Self::Lowercase,
        Self::Reverse,
        Self::TitleCase,
        Self::RemoveSpaces,
        Self::Slugify,
    ];

    /// Path segment used in the route, e.g. `title-case`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Reverse => "reverse",
            Self::TitleCase => "title-case",
            Self::RemoveSpaces => "remove-spaces",
            Self::Slugify => "slugify",
        }
    }

    /// Name reported in responses, e.g. `title_case`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Uppercase => "uppercase",
            Self::Lowercase => "lowercase",
            Self::Reverse => "reverse",
            Self::TitleCase => "title_case",
            Self::RemoveSpaces => "remove_spaces",
            Self::Slugify => "slugify",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Uppercase => "Convert text to uppercase",
            Self::Lowercase => "Convert text to lowercase",
            Self::Reverse => "Reverse the text",
            Self::TitleCase => "Convert to title case",
            Self::RemoveSpaces => "Remove all spaces",
            Self::Slugify => "Convert to URL-friendly slug",
        }
    }

    pub fn from_slug(slug: &str) -> Result<Self, TextError> {
        Self::ALL
            .into_iter()
            .find(|op| op.slug() == slug)
            .ok_or_else(|| TextError::UnknownOperation(slug.to_string()))
    }

    pub fn apply(self, text: &str) -> Result<String, TextError> {
        if text.is_empty() {
            return Err(TextError::Empty);
        }

        Ok(match self {
            Self::Uppercase => text.to_uppercase(),
            Self::Lowercase => text.to_lowercase(),
            Self::Reverse => text.chars().rev().collect(),
            Self::TitleCase => title_case(text),
            Self::RemoveSpaces => text.replace(' ', ""),
            Self::Slugify => slugify(text),
        })
    }
}

/// Upper-cases the first letter of every alphabetic run, lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for c in text.to_lowercase().chars() {
        match c {
            ' ' | '_' | '.' | '-' => {
                if !slug.ends_with('-') {
                    slug.push('-');
                }
            }
            ',' => {}
            other => slug.push(other),
        }
    }

    slug.trim_matches('-').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextAnalysis {
    pub word_count: usize,
    pub character_count: usize,
    pub sentence_count: usize,
    pub reading_time: String,
}

pub fn analyze(text: &str) -> Result<TextAnalysis, TextError> {
    if text.is_empty() {
        return Err(TextError::Empty);
    }

    let word_count = text.split_whitespace().count();
    let sentence_count = text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count();

    Ok(TextAnalysis {
        word_count,
        character_count: text.chars().count(),
        sentence_count,
        reading_time: format!("{} min", (word_count / WORDS_PER_MINUTE).max(1)),
    })
}
