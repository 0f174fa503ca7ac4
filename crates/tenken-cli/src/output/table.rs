use tenken_core::model::{Finding, TicketRow};

pub fn print_finding(filename: &str, finding: &Finding) {
    println!("=== {} ===\n", filename);
    println!("  Issue:       {}", finding.has_issue);
    println!("  Summary:     {}", non_empty(&finding.summary));
    println!("  Remediation: {}", finding.remediation_status.label());
    println!("  Source:      {}", finding.source);

    if !finding.items.is_empty() {
        println!("\n  Items:");
        for item in &finding.items {
            println!("    [{}] {}", item.severity, item.text);
        }
    }
    println!();
}

pub fn print_tickets(rows: &[TicketRow]) {
    if rows.is_empty() {
        println!("No ticket rows found.");
        return;
    }

    let headers = ["#", "Date", "Company", "File", "Status", "Notes"];
    let cells: Vec<[String; 6]> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                (i + 1).to_string(),
                r.date.clone(),
                r.company.clone(),
                r.target_file.clone(),
                r.status.clone(),
                r.notes.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(display_width);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(display_width(cell));
        }
    }

    print_row(&headers.map(str::to_string), &widths);
    println!(
        "  {}",
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ")
    );
    for row in &cells {
        print_row(row, &widths);
    }
    println!("\n  {} row(s)", rows.len());
}

fn print_row(cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, w)| {
            let pad = w.saturating_sub(display_width(cell));
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect();
    println!("  {}", padded.join("  ").trim_end());
}

/// Terminal columns taken by `s`; CJK and other wide characters count as two.
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if is_wide(c) { 2 } else { 1 }).sum()
}

fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0x303E
        | 0x3041..=0x33FF
        | 0x3400..=0x4DBF
        | 0x4E00..=0x9FFF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6)
}

fn non_empty(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
