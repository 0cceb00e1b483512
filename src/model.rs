use crate::error::{DeckstripError, DeckstripResult};

/// One chapter of the deck: a display name plus how many slides it owns.
///
/// Chapters are identified by their position in [`Deck::chapters`]; index 0 is
/// the first (rightmost) chapter.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Chapter {
    pub name: String,
    pub slide_count: u32,
}

/// Ordered, immutable sequence of chapters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Deck {
    pub chapters: Vec<Chapter>,
}

impl Deck {
    pub fn new(chapters: Vec<Chapter>) -> DeckstripResult<Self> {
        let deck = Self { chapters };
        deck.validate()?;
        Ok(deck)
    }

    pub fn validate(&self) -> DeckstripResult<()> {
        if self.chapters.is_empty() {
            return Err(DeckstripError::validation(
                "deck must contain at least one chapter",
            ));
        }
        for (i, chapter) in self.chapters.iter().enumerate() {
            if chapter.name.trim().is_empty() {
                return Err(DeckstripError::validation(format!(
                    "chapter {} has an empty name",
                    i + 1
                )));
            }
            if chapter.slide_count == 0 {
                return Err(DeckstripError::validation(format!(
                    "chapter '{}' must have at least one slide",
                    chapter.name
                )));
            }
        }
        Ok(())
    }

    pub fn total_slides(&self) -> u32 {
        self.chapters.iter().map(|c| c.slide_count).sum()
    }

    /// Largest per-chapter slide count. Sizes the horizontal block reserved
    /// for every chapter, regardless of that chapter's own slide count.
    pub fn max_slides(&self) -> u32 {
        self.chapters
            .iter()
            .map(|c| c.slide_count)
            .max()
            .unwrap_or(0)
    }

    /// Number of slides in chapters before `chapter` (0-based).
    pub fn base_offset(&self, chapter: usize) -> u32 {
        self.chapters[..chapter].iter().map(|c| c.slide_count).sum()
    }
}
