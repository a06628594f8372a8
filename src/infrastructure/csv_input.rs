// CSV reader for bulk URL import
use csv::ReaderBuilder;

/// Read every record of a CSV file as raw cells. No header row; rows may differ in length.
pub fn read_rows(data: &[u8]) -> csv::Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_ragged_rows_without_header() {
        let rows = read_rows(b"url\nhttp://a.com, http://b.com\n\nhttp://c.com,,\n").unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["url"],
                vec!["http://a.com", "http://b.com"],
                vec!["http://c.com", "", ""],
            ]
        );
    }

    #[test]
    fn test_quoted_cells_keep_commas() {
        let rows = read_rows(b"\"http://a.com/?q=1,2\",http://b.com\n").unwrap();
        assert_eq!(rows[0][0], "http://a.com/?q=1,2");
    }

    #[test]
    fn test_empty_input_has_no_rows() {
        assert!(read_rows(b"").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        assert!(read_rows(b"http://a.com,\xff\n").is_err());
    }
}
