//! CSV → row mappings. The first record names the columns.

use std::io::Read;

use crate::upload::models::Row;

/// Parses comma-delimited data into one [`Row`] per record.
///
/// Records may be ragged: values past the header width are keyed `_<index>`,
/// and a short record simply has fewer keys. Invalid UTF-8 is replaced rather
/// than rejected.
pub fn parse_csv<R: Read>(source: R) -> Result<Vec<Row>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let mut row = Row::with_capacity(headers.len());
        for (index, value) in record.iter().enumerate() {
            let key = headers
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("_{index}"));
            row.insert(key, String::from_utf8_lossy(value).into_owned());
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_csv_keys_rows_by_header() {
        let rows = parse_csv("id,name,score\n1,Alice,95\n2,Bob,87".as_bytes()).unwrap();
        assert_eq!(
            rows,
            vec![
                row(&[("id", "1"), ("name", "Alice"), ("score", "95")]),
                row(&[("id", "2"), ("name", "Bob"), ("score", "87")]),
            ]
        );
    }

    #[test]
    fn test_parse_csv_preserves_header_order() {
        let rows = parse_csv("zeta,alpha,mid\n1,2,3\n".as_bytes()).unwrap();
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_csv_ragged_records() {
        let rows = parse_csv("a,b\n1,2,3\n4\n".as_bytes()).unwrap();
        assert_eq!(rows[0], row(&[("a", "1"), ("b", "2"), ("_2", "3")]));
        assert_eq!(rows[1], row(&[("a", "4")]));
    }

    #[test]
    fn test_parse_csv_skips_blank_lines() {
        let rows = parse_csv("a,b\n1,2\n\n3,4\n".as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_csv_header_only_yields_no_rows() {
        let rows = parse_csv("a,b,c\n".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_csv_quoted_commas() {
        let rows = parse_csv("name,quote\nAda,\"hello, world\"\n".as_bytes()).unwrap();
        assert_eq!(rows[0]["quote"], "hello, world");
    }
}
