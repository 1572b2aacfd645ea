//! Terminal rendering of the roster table and the summary document.

use std::fmt::Write as _;

use client_core::SummaryDocument;
use shared::domain::Participant;

pub struct TableRow<'a> {
    pub participant: &'a Participant,
    pub can_confirm: bool,
    pub tentative: bool,
}

pub fn roster_table(rows: &[TableRow<'_>]) -> String {
    let name_width = rows
        .iter()
        .map(|row| row.participant.name.chars().count())
        .chain(std::iter::once("NAME".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<8}  {:<name_width$}  {:<12}  {:<14}  ACTION",
        "NO", "ID", "NAME", "PEMBAYARAN", "KEHADIRAN"
    );
    for (offset, row) in rows.iter().enumerate() {
        let attendance = if row.tentative {
            format!("{}*", row.participant.attendance_status)
        } else {
            row.participant.attendance_status.to_string()
        };
        let action = if row.can_confirm { "hadir" } else { "-" };
        let _ = writeln!(
            out,
            "{:>3}  {:<8}  {:<name_width$}  {:<12}  {:<14}  {}",
            offset + 1,
            row.participant.id,
            row.participant.name,
            row.participant.payment_status.as_str(),
            attendance,
            action
        );
    }
    if rows.iter().any(|row| row.tentative) {
        out.push_str("* confirmed locally; not yet reflected by the service\n");
    }
    out
}

pub fn summary_text(document: &SummaryDocument) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:<32}  HADIR", "NO", "NAMA");
    for row in &document.rows {
        let _ = writeln!(out, "{:>3}  {:<32}  {}", row.index, row.name, row.present_glyph);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Hadir: {}", document.present_count);
    let _ = writeln!(out, "Tidak hadir: {}", document.absent_count);
    out
}

pub fn summary_json(document: &SummaryDocument) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}
