//! Count sparkline widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different count levels (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline widget showing counts over a series of slots
///
/// Used for the per-gate hourly distributions and the daily delay trend.
pub struct CountSparkline<'a> {
    /// Count for each slot
    counts: &'a [u64],
    /// Maximum count for normalization
    max_count: u64,
    /// Highlighted slot (e.g. the fleet-wide peak hour)
    highlight: Option<usize>,
    /// Style for the sparkline
    style: Style,
    /// Style for the highlighted slot
    highlight_style: Style,
}

impl<'a> CountSparkline<'a> {
    pub fn new(counts: &'a [u64], max_count: u64) -> Self {
        Self {
            counts,
            max_count,
            highlight: None,
            style: Style::default().fg(Color::Cyan),
            highlight_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn highlight(mut self, slot: usize) -> Self {
        self.highlight = Some(slot);
        self
    }

    #[allow(dead_code)]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn count_to_block(&self, count: u64) -> char {
        if self.max_count == 0 {
            return BLOCKS[0];
        }
        let normalized = (count as f64 / self.max_count as f64).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for CountSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, count) in self.counts.iter().take(width).enumerate() {
            let block = self.count_to_block(*count);
            let x = area.x + i as u16;
            let y = area.y;

            let style = if self.highlight == Some(i) {
                self.highlight_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}

/// Renders counts as a block-character string, for embedding in text lines
pub fn sparkline_string(counts: &[u64]) -> String {
    let max = counts.iter().copied().max().unwrap_or(0);
    counts
        .iter()
        .map(|&count| {
            if max == 0 {
                BLOCKS[0]
            } else {
                let normalized = (count as f64 / max as f64).clamp(0.0, 1.0);
                BLOCKS[((normalized * 7.0).round() as usize).min(7)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_to_block_minimum() {
        let sparkline = CountSparkline::new(&[], 40);
        assert_eq!(sparkline.count_to_block(0), '▁');
    }

    #[test]
    fn test_count_to_block_maximum() {
        let sparkline = CountSparkline::new(&[], 40);
        assert_eq!(sparkline.count_to_block(40), '█');
    }

    #[test]
    fn test_count_to_block_mid() {
        let sparkline = CountSparkline::new(&[], 40);
        let block = sparkline.count_to_block(20);
        assert!(BLOCKS.contains(&block));
    }

    #[test]
    fn test_count_to_block_zero_max() {
        let sparkline = CountSparkline::new(&[], 0);
        assert_eq!(sparkline.count_to_block(10), '▁');
    }

    #[test]
    fn test_count_to_block_above_max_clamps() {
        let sparkline = CountSparkline::new(&[], 40);
        assert_eq!(sparkline.count_to_block(100), '█');
    }

    #[test]
    fn test_sparkline_creation() {
        let counts = vec![1, 2, 3, 4, 3, 2, 1];
        let sparkline = CountSparkline::new(&counts, 4)
            .highlight(3)
            .style(Style::default().fg(Color::Blue));

        assert_eq!(sparkline.counts.len(), 7);
        assert_eq!(sparkline.highlight, Some(3));
    }

    #[test]
    fn test_sparkline_string_peaks() {
        let rendered = sparkline_string(&[0, 5, 10]);
        let chars: Vec<char> = rendered.chars().collect();
        assert_eq!(chars.len(), 3);
        assert_eq!(chars[0], '▁');
        assert_eq!(chars[2], '█');
    }

    #[test]
    fn test_sparkline_string_all_zero() {
        let rendered = sparkline_string(&[0, 0, 0]);
        assert!(rendered.chars().all(|c| c == '▁'));
    }
}
