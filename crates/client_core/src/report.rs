//! Attendance summary document. Layout and export belong to whoever renders
//! the document; this module only decides what goes in it.

use serde::Serialize;
use shared::domain::Participant;

pub const PRESENT_GLYPH: &str = "✓";
pub const ABSENT_GLYPH: &str = "✗";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportScope {
    /// Rows currently passing the active filters.
    #[default]
    Filtered,
    Full,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub index: usize,
    pub name: String,
    pub present_glyph: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDocument {
    pub rows: Vec<SummaryRow>,
    pub present_count: usize,
    pub absent_count: usize,
}

impl SummaryDocument {
    pub fn total(&self) -> usize {
        self.present_count + self.absent_count
    }
}

/// Rows are numbered from 1 in input order.
pub fn build_summary<'a, I>(participants: I) -> SummaryDocument
where
    I: IntoIterator<Item = &'a Participant>,
{
    let mut rows = Vec::new();
    let mut present_count = 0;

    for (offset, participant) in participants.into_iter().enumerate() {
        let present = participant.is_present();
        if present {
            present_count += 1;
        }
        rows.push(SummaryRow {
            index: offset + 1,
            name: participant.name.clone(),
            present_glyph: if present { PRESENT_GLYPH } else { ABSENT_GLYPH }.to_string(),
        });
    }

    SummaryDocument {
        absent_count: rows.len() - present_count,
        present_count,
        rows,
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
