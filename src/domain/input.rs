// URL input normalization for typed text and imported CSV rows

/// Split raw operator input into candidate URLs.
///
/// Tokens are separated by whitespace, commas or semicolons. Order and duplicates are kept;
/// the backend treats repeated submissions as independent checks.
pub fn normalize(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Flatten parsed CSV rows into one sequence, dropping empty cells.
pub fn flatten_rows(rows: Vec<Vec<String>>) -> Vec<String> {
    rows.into_iter()
        .flatten()
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Render flattened cells as editable draft text, one entry per line.
pub fn draft_text(cells: &[String]) -> String {
    cells.join("\n")
}
