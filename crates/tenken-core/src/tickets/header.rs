/// Logical columns of a ticket sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Company,
    TargetFile,
    Status,
    Notes,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Date,
        Column::Company,
        Column::TargetFile,
        Column::Status,
        Column::Notes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::Company => "company",
            Column::TargetFile => "target_file",
            Column::Status => "status",
            Column::Notes => "notes",
        }
    }

    /// Recognized header spellings, compared after normalization.
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Date => &["日付", "点検日", "実施日", "作業日", "date"],
            Column::Company => &["会社名", "業者名", "協力会社", "会社", "業者", "company", "vendor"],
            Column::TargetFile => &[
                "対象ファイル",
                "ファイル名",
                "ファイル",
                "報告書",
                "file",
                "filename",
                "targetfile",
            ],
            Column::Status => &["ステータス", "状況", "対応状況", "状態", "status"],
            Column::Notes => &["備考", "メモ", "コメント", "notes", "remarks", "memo"],
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Column::TargetFile | Column::Status)
    }
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub company: Option<usize>,
    pub target_file: Option<usize>,
    pub status: Option<usize>,
    pub notes: Option<usize>,
}

impl ColumnMap {
    pub fn get(&self, column: Column) -> Option<usize> {
        match column {
            Column::Date => self.date,
            Column::Company => self.company,
            Column::TargetFile => self.target_file,
            Column::Status => self.status,
            Column::Notes => self.notes,
        }
    }

    fn set(&mut self, column: Column, idx: usize) {
        let slot = match column {
            Column::Date => &mut self.date,
            Column::Company => &mut self.company,
            Column::TargetFile => &mut self.target_file,
            Column::Status => &mut self.status,
            Column::Notes => &mut self.notes,
        };
        *slot = Some(idx);
    }

    fn is_taken(&self, idx: usize) -> bool {
        Column::ALL.iter().any(|c| self.get(*c) == Some(idx))
    }
}

/// Locate ticket columns in a header row.
///
/// Exact alias matches are assigned first so that a header like "対応状況"
/// is not claimed by a looser substring match for another column.
pub fn map_columns(header: &[String]) -> ColumnMap {
    let normalized: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    let mut map = ColumnMap::default();

    for column in Column::ALL {
        if let Some(idx) = normalized
            .iter()
            .position(|h| column.aliases().iter().any(|a| h == a))
        {
            if !map.is_taken(idx) {
                map.set(column, idx);
            }
        }
    }

    for column in Column::ALL {
        if map.get(column).is_some() {
            continue;
        }
        let found = normalized.iter().enumerate().find(|(idx, h)| {
            !h.is_empty()
                && !map.is_taken(*idx)
                && column.aliases().iter().any(|a| h.contains(a))
        });
        if let Some((idx, _)) = found {
            map.set(column, idx);
        }
    }

    map
}

/// Lowercase and strip whitespace, underscores and full-width spaces.
fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_map_japanese_headers() {
        let map = map_columns(&header(&["日付", "会社名", "対象ファイル", "ステータス", "備考"]));
        assert_eq!(map.date, Some(0));
        assert_eq!(map.company, Some(1));
        assert_eq!(map.target_file, Some(2));
        assert_eq!(map.status, Some(3));
        assert_eq!(map.notes, Some(4));
    }

    #[test]
    fn test_map_english_headers_any_order() {
        let map = map_columns(&header(&["Status", "Target File", "Company", "Date"]));
        assert_eq!(map.status, Some(0));
        assert_eq!(map.target_file, Some(1));
        assert_eq!(map.company, Some(2));
        assert_eq!(map.date, Some(3));
        assert_eq!(map.notes, None);
    }

    #[test]
    fn test_substring_match_fallback() {
        let map = map_columns(&header(&["点検日(予定)", "協力会社名", "PDFファイル名", "現在の対応状況"]));
        assert_eq!(map.date, Some(0));
        assert_eq!(map.company, Some(1));
        assert_eq!(map.target_file, Some(2));
        assert_eq!(map.status, Some(3));
    }

    #[test]
    fn test_bom_prefixed_header() {
        let map = map_columns(&header(&["\u{feff}date", "file", "status"]));
        assert_eq!(map.date, Some(0));
    }
}
