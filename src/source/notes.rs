//! Note cards: user-editable content blocks rendered as feed items.

use anyhow::Result;

use crate::catalog::{NoteBlock, NoteBlockKind};

use super::{DataSource, FeedItem};

pub struct NotesSource {
    card: String,
    blocks: Vec<NoteBlock>,
}

impl NotesSource {
    /// Sources are rebuilt whenever the card set or the custom catalog
    /// changes, so the snapshot taken here stays current.
    pub fn new(card: impl Into<String>, blocks: Vec<NoteBlock>) -> Self {
        Self {
            card: card.into(),
            blocks,
        }
    }

    /// Render one block as a single display line.  `ordinal` is the block's
    /// 1-based position within its run of numbered-list blocks; it is only
    /// read for [`NoteBlockKind::NumberedList`].
    fn block_line(block: &NoteBlock, ordinal: usize) -> String {
        match block.kind {
            NoteBlockKind::Paragraph => block.text.clone(),
            NoteBlockKind::Heading => format!("# {}", block.text),
            NoteBlockKind::Todo if block.checked => format!("[x] {}", block.text),
            NoteBlockKind::Todo => format!("[ ] {}", block.text),
            NoteBlockKind::BulletedList => format!("• {}", block.text),
            NoteBlockKind::NumberedList => format!("{ordinal}. {}", block.text),
            NoteBlockKind::Quote => format!("> {}", block.text),
            NoteBlockKind::Divider => "────────".to_string(),
        }
    }
}

impl DataSource for NotesSource {
    fn card(&self) -> &str {
        &self.card
    }

    fn fetch(&self) -> Result<Vec<FeedItem>> {
        // Numbered lists count up through consecutive numbered blocks and
        // restart after anything else.
        let mut ordinal = 0;
        Ok(self
            .blocks
            .iter()
            .map(|block| {
                ordinal = match block.kind {
                    NoteBlockKind::NumberedList => ordinal + 1,
                    _ => 0,
                };
                FeedItem {
                    id: block.id.clone(),
                    title: Self::block_line(block, ordinal),
                    link: None,
                    published: None,
                    meta: None,
                }
            })
            .collect())
    }
}
