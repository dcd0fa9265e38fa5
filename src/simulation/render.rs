/*!
 * Memory Map Rendering
 * Proportional layout of blocks against total memory, as text
 */

use crate::core::types::{Address, BlockId, Size};
use crate::memory::MemoryBlock;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const FREE_LABEL: &str = "Free";

/// One block positioned on the memory bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub block_id: BlockId,
    pub start: Address,
    pub size: Size,
    pub is_free: bool,
    /// Owning process name, or "Free"
    pub label: String,
    pub offset_percent: f64,
    pub width_percent: f64,
}

/// Blocks laid out proportionally to their size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMap {
    pub total_memory: Size,
    pub segments: Vec<Segment>,
}

impl MemoryMap {
    pub fn from_blocks(blocks: &[MemoryBlock], total_memory: Size) -> Self {
        let percent = |value: Size| {
            if total_memory == 0 {
                0.0
            } else {
                value as f64 / total_memory as f64 * 100.0
            }
        };

        let segments = blocks
            .iter()
            .map(|block| Segment {
                block_id: block.id,
                start: block.start,
                size: block.size,
                is_free: block.is_free(),
                label: block.process_name().unwrap_or(FREE_LABEL).to_string(),
                offset_percent: percent(block.start),
                width_percent: percent(block.size),
            })
            .collect();

        Self {
            total_memory,
            segments,
        }
    }

    /// Single-line bar, `columns` characters wide
    ///
    /// Free space is drawn with `.`; allocated blocks with the first character
    /// of the owner's name. Every block gets at least one column.
    pub fn render_bar(&self, columns: usize) -> String {
        let columns = columns.max(self.segments.len()).max(1);
        let mut bar = String::with_capacity(columns + 2);
        bar.push('[');

        let mut drawn = 0;
        for (i, segment) in self.segments.iter().enumerate() {
            let remaining_segments = self.segments.len() - i - 1;
            let end = if remaining_segments == 0 {
                columns
            } else {
                let ideal = ((segment.offset_percent + segment.width_percent) / 100.0
                    * columns as f64)
                    .round() as usize;
                ideal.clamp(drawn + 1, columns - remaining_segments)
            };

            let glyph = if segment.is_free {
                '.'
            } else {
                segment.label.chars().next().unwrap_or('#')
            };
            bar.extend(std::iter::repeat(glyph).take(end - drawn));
            drawn = end;
        }

        bar.push(']');
        bar
    }

    /// One line per block: range, size, share of memory and owner
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<10} {:>7} {:>7} {:>7}  {}",
            "BLOCK", "START", "SIZE", "SHARE", "OWNER"
        );
        for segment in &self.segments {
            let _ = writeln!(
                out,
                "{:<10} {:>7} {:>7} {:>6.1}%  {}",
                segment.block_id.to_string(),
                segment.start,
                segment.size,
                segment.width_percent,
                segment.label
            );
        }
        out
    }
}
