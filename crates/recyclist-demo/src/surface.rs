#![forbid(unsafe_code)]

//! A text render surface: one fixed-width row per node.
//!
//! Nodes keep their row buffers across rebinds; only the cell text is
//! rewritten. The leading offset is drawn as a single marker row counting
//! the records scrolled past.

use std::collections::{HashMap, VecDeque};

use recyclist::{Edge, NodeId, RenderSurface};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::city::{COLUMNS, City};

/// Display widths of [`COLUMNS`], in terminal cells.
pub const WIDTHS: [usize; 6] = [4, 16, 5, 3, 8, 9];

/// Pad or truncate `text` to exactly `width` cells.
///
/// Truncated text ends in `…` when there is room for it.
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let used = text.width();
    if used <= width {
        let mut out = String::with_capacity(text.len() + width - used);
        out.push_str(text);
        out.extend(std::iter::repeat_n(' ', width - used));
        return out;
    }
    if width == 0 {
        return String::new();
    }
    let budget = width - 1;
    let mut out = String::new();
    let mut cells = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if cells + w > budget {
            break;
        }
        out.push(ch);
        cells += w;
    }
    out.push('…');
    cells += 1;
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(cells)));
    out
}

fn render_row(cells: &[String; 6]) -> String {
    cells
        .iter()
        .zip(WIDTHS)
        .map(|(cell, width)| fit(cell, width))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Header row matching [`WIDTHS`].
#[must_use]
pub fn header() -> String {
    render_row(&COLUMNS.map(String::from))
}

#[derive(Debug, Clone, Default)]
pub struct TextSurface {
    item_height: f64,
    order: VecDeque<NodeId>,
    rows: HashMap<NodeId, String>,
    offset: f64,
    rewrites: u64,
    scroll_resets: u32,
}

impl TextSurface {
    #[must_use]
    pub fn new(item_height: f64) -> Self {
        Self {
            item_height,
            ..Self::default()
        }
    }

    /// Records represented by the leading offset.
    #[must_use]
    pub fn rows_above(&self) -> usize {
        if self.item_height > 0.0 {
            (self.offset / self.item_height).round() as usize
        } else {
            0
        }
    }

    /// Row texts rewritten through rebinds.
    #[must_use]
    pub fn rewrites(&self) -> u64 {
        self.rewrites
    }

    #[must_use]
    pub fn scroll_resets(&self) -> u32 {
        self.scroll_resets
    }

    /// Row buffers allocated, attached or parked.
    #[must_use]
    pub fn buffers(&self) -> usize {
        self.rows.len()
    }

    /// Render the header, the offset marker and every attached row.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.order.len() + 2);
        lines.push(header());
        let above = self.rows_above();
        if above > 0 {
            lines.push(format!("  ⋮ {above} above"));
        }
        lines.extend(
            self.order
                .iter()
                .filter_map(|node| self.rows.get(node).cloned()),
        );
        lines
    }
}

impl RenderSurface<City> for TextSurface {
    fn attach(&mut self, node: NodeId, _index: usize, record: &City) {
        self.rows.insert(node, render_row(&record.cells()));
        self.order.push_back(node);
    }

    fn rebind(&mut self, node: NodeId, _index: usize, record: &City, edge: Edge) {
        let moved = match edge {
            Edge::Head => self.order.pop_back(),
            Edge::Tail => self.order.pop_front(),
        };
        debug_assert_eq!(moved, Some(node), "rebound node not at the opposite edge");
        match edge {
            Edge::Head => self.order.push_front(node),
            Edge::Tail => self.order.push_back(node),
        }
        let row = self.rows.entry(node).or_default();
        row.clear();
        row.push_str(&render_row(&record.cells()));
        self.rewrites += 1;
    }

    fn detach(&mut self, node: NodeId) {
        self.order.retain(|&n| n != node);
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn scroll_to_top(&mut self) {
        self.scroll_resets += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(objectid: u32, name: &str) -> City {
        City {
            objectid,
            areaname: name.into(),
            class: "city".into(),
            st: "OR".into(),
            capital: "N".into(),
            pop2000: 1000,
            x: 0.0,
            y: 0.0,
        }
    }

    #[test]
    fn fit_pads_and_truncates_by_cells() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("東京都市", 5), "東京…");
        assert_eq!(fit("東京都市", 5).width(), 5);
        assert_eq!(fit("東京", 2), "東京");
        assert_eq!(fit("x", 0), "");
    }

    #[test]
    fn rows_have_uniform_width() {
        let a = render_row(&city(1, "Oregon City").cells());
        let b = render_row(&city(22, "Mount Angel Junction Extra").cells());
        assert_eq!(a.width(), b.width());
        assert_eq!(header().width(), a.width());
    }

    #[test]
    fn rebind_rewrites_in_place_and_moves() {
        let mut surface = TextSurface::new(1.0);
        surface.attach(NodeId(0), 0, &city(1, "Canby"));
        surface.attach(NodeId(1), 1, &city(2, "Sandy"));
        surface.rebind(NodeId(0), 2, &city(3, "Molalla"), Edge::Tail);
        surface.set_offset(1.0);

        let lines = surface.render();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("1 above"));
        assert!(lines[2].contains("Sandy"));
        assert!(lines[3].contains("Molalla"));
        assert_eq!(surface.buffers(), 2);
        assert_eq!(surface.rewrites(), 1);

        surface.rebind(NodeId(0), 0, &city(1, "Canby"), Edge::Head);
        let lines = surface.render();
        assert!(lines[2].contains("Canby"));
        assert!(lines[3].contains("Sandy"));
        assert_eq!(surface.rewrites(), 2);

        surface.detach(NodeId(1));
        surface.detach(NodeId(0));
        surface.set_offset(0.0);
        assert_eq!(surface.render().len(), 1);
        assert_eq!(surface.buffers(), 2);
    }
}
