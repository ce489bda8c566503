use crate::error::ParseError;

pub const FIELD_DELIMITER: char = ',';

/// Minimum number of fields a record line must carry.
pub const RECORD_FIELD_COUNT: usize = 6;

/// One parsed quote row. Produced fresh per scrape and never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub date: String,
    pub close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

/// Parse a record line laid out as `date,close,high,low,open,volume`.
///
/// The upstream column order is `d,c,h,l,o,v` regardless of the order the
/// fields were requested in, so positions are fixed here.
pub fn parse_quote_line(line: &str) -> Result<QuoteRecord, ParseError> {
    let fields = split_record_line(line);
    if fields.len() < RECORD_FIELD_COUNT {
        return Err(ParseError::InsufficientFields {
            found: fields.len(),
        });
    }

    Ok(QuoteRecord {
        date: fields[0].to_string(),
        close: parse_f64("close", fields[1])?,
        high: parse_f64("high", fields[2])?,
        low: parse_f64("low", fields[3])?,
        open: parse_f64("open", fields[4])?,
        volume: parse_f64("volume", fields[5])?,
    })
}

pub fn split_record_line(line: &str) -> Vec<&str> {
    line.split(FIELD_DELIMITER).map(str::trim).collect()
}

pub fn parse_f64(field: &'static str, value: &str) -> Result<f64, ParseError> {
    let parsed = value
        .parse::<f64>()
        .map_err(|err| ParseError::InvalidNumber {
            field,
            raw: value.to_string(),
            reason: err.to_string(),
        })?;

    if !parsed.is_finite() {
        return Err(ParseError::InvalidNumber {
            field,
            raw: value.to_string(),
            reason: "value is not finite".to_string(),
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_positions_to_upstream_column_order() {
        let record = parse_quote_line("a1500000000,100.5,101,98.5,99,12345").unwrap();

        assert_eq!(record.date, "a1500000000");
        assert_eq!(record.close, 100.5);
        assert_eq!(record.high, 101.0);
        assert_eq!(record.low, 98.5);
        assert_eq!(record.open, 99.0);
        assert_eq!(record.volume, 12345.0);
    }

    #[test]
    fn ignores_trailing_fields() {
        let record = parse_quote_line("1,2,3,4,5,6,extra,7").unwrap();
        assert_eq!(record.volume, 6.0);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let record = parse_quote_line("1, 10.25 ,11,9,10,500\r").unwrap();
        assert_eq!(record.close, 10.25);
        assert_eq!(record.volume, 500.0);
    }

    #[test]
    fn rejects_short_lines() {
        let err = parse_quote_line("a1500000000,100.5,101,98.5,99").unwrap_err();
        assert_eq!(err, ParseError::InsufficientFields { found: 5 });

        let err = parse_quote_line("").unwrap_err();
        assert_eq!(err, ParseError::InsufficientFields { found: 1 });
    }

    #[test]
    fn names_the_first_invalid_field() {
        let err = parse_quote_line("d,100.5,101,oops,bad,12345").unwrap_err();
        match err {
            ParseError::InvalidNumber { field, raw, .. } => {
                assert_eq!(field, "low");
                assert_eq!(raw, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_empty_and_non_finite_numbers() {
        let err = parse_quote_line("d,,101,98,99,1").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { field: "close", .. }));

        let err = parse_quote_line("d,1,2,3,4,NaN").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { field: "volume", .. }));

        let err = parse_quote_line("d,1,inf,3,4,5").unwrap_err();
        assert!(
            err.to_string().contains("not finite"),
            "unexpected error message: {err}"
        );
    }
}
