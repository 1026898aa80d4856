//! Rendering result with metadata and statistics.

use std::collections::BTreeMap;

use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered content (HTML, RML or Markdown)
    pub content: String,

    /// Document metadata (copied from source document)
    pub metadata: Metadata,

    /// Rendering statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, metadata: Metadata, stats: RenderStats) -> Self {
        Self {
            content,
            metadata,
            stats,
        }
    }

    /// Get the content length in bytes.
    pub fn content_len(&self) -> usize {
        self.content.len()
    }
}

/// Statistics collected while traversing a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of pages rendered
    pub page_count: u32,

    /// Number of paragraph blocks
    pub paragraph_count: u32,

    /// Number of heading blocks
    pub heading_count: u32,

    /// Number of list blocks
    pub list_count: u32,

    /// Number of positioned frames
    pub frame_count: u32,

    /// Skipped regions by category name
    pub unhandled: BTreeMap<String, u32>,

    /// Approximate word count of emitted block text
    pub word_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment heading count.
    pub fn add_heading(&mut self) {
        self.heading_count += 1;
    }

    /// Increment list count.
    pub fn add_list(&mut self) {
        self.list_count += 1;
    }

    /// Increment frame count.
    pub fn add_frame(&mut self) {
        self.frame_count += 1;
    }

    /// Record a skipped region.
    pub fn add_unhandled(&mut self, category: &str) {
        *self.unhandled.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Total number of content blocks.
    pub fn block_count(&self) -> u32 {
        self.paragraph_count + self.heading_count + self.list_count
    }

    /// Total number of skipped regions.
    pub fn unhandled_count(&self) -> u32 {
        self.unhandled.values().sum()
    }

    /// Add word counts from block text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.page_count += other.page_count;
        self.paragraph_count += other.paragraph_count;
        self.heading_count += other.heading_count;
        self.list_count += other.list_count;
        self.frame_count += other.frame_count;
        self.word_count += other.word_count;
        for (name, count) in &other.unhandled {
            *self.unhandled.entry(name.clone()).or_insert(0) += count;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats_count_text() {
        let mut stats = RenderStats::new();
        stats.count_text("Geachte heer, hierbij het besluit.");
        assert_eq!(stats.word_count, 5);
    }

    #[test]
    fn test_render_stats_merge() {
        let mut stats1 = RenderStats::new();
        stats1.paragraph_count = 5;
        stats1.add_unhandled("figure");

        let mut stats2 = RenderStats {
            paragraph_count: 3,
            heading_count: 1,
            frame_count: 4,
            ..Default::default()
        };
        stats2.add_unhandled("figure");
        stats2.add_unhandled("table");

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.block_count(), 9);
        assert_eq!(stats1.frame_count, 4);
        assert_eq!(stats1.unhandled["figure"], 2);
        assert_eq!(stats1.unhandled_count(), 3);
    }
}
