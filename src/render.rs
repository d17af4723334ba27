//! Text view of the grid as the solver sees it.

use std::collections::HashMap;

use crate::cell::Cell;
use crate::knowledge::KnowledgeBase;

/// Render the solver's view, one row per line.
///
/// - digit: probed cell, showing its revealed neighbor count
/// - `F`: confirmed hazard
/// - `s`: confirmed safe, not yet probed
/// - `-`: unknown
pub fn render_knowledge(kb: &KnowledgeBase, revealed: &HashMap<Cell, usize>) -> String {
    let mut out = String::with_capacity(kb.height() * (kb.width() * 2 + 1));
    for row in 0..kb.height() {
        for col in 0..kb.width() {
            let cell = Cell::new(row, col);
            if col > 0 {
                out.push(' ');
            }
            match revealed.get(&cell) {
                Some(count) => out.push_str(&count.to_string()),
                None if kb.hazards().contains(&cell) => out.push('F'),
                None if kb.safe().contains(&cell) => out.push('s'),
                None => out.push('-'),
            }
        }
        out.push('\n');
    }
    out
}
