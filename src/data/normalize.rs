use super::error::FieldError;
use super::model::{
    RawRecord, RawValue, TitleRecord, COUNTRY_COLUMN, EXPECTED_COLUMNS, GENRES_COLUMN,
    RELEASE_YEAR_COLUMN, SENTINEL_YEAR, TITLE_COLUMN, TYPE_COLUMN, UNKNOWN,
};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Convert loosely-typed rows into canonical [`TitleRecord`]s.
///
/// Never fails: every malformed or missing cell degrades to its default
/// (`"Unknown"`, the sentinel year, or `["Unknown"]`). Columns that are absent
/// from every row are reported once as a warning.
pub fn normalize(rows: &[RawRecord]) -> Vec<TitleRecord> {
    for column in missing_columns(rows) {
        log::warn!("column '{column}' is missing from the catalog, using defaults for every row");
    }
    rows.iter().map(normalize_record).collect()
}

/// Expected columns that no row carries at all.
pub fn missing_columns(rows: &[RawRecord]) -> Vec<&'static str> {
    if rows.is_empty() {
        return Vec::new();
    }
    EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !rows.iter().any(|row| row.contains_key(*column)))
        .collect()
}

pub fn normalize_record(row: &RawRecord) -> TitleRecord {
    TitleRecord {
        title: text_field(row.get(TITLE_COLUMN)),
        kind: text_field(row.get(TYPE_COLUMN)),
        country: text_field(row.get(COUNTRY_COLUMN)),
        release_year: row
            .get(RELEASE_YEAR_COLUMN)
            .map_or(SENTINEL_YEAR, coerce_year),
        genres: row
            .get(GENRES_COLUMN)
            .map_or_else(unknown_genres, parse_genres),
    }
}

/// Coerce a cell to a release year, or [`SENTINEL_YEAR`] when that fails.
pub fn coerce_year(value: &RawValue) -> i32 {
    year_from(value).unwrap_or(SENTINEL_YEAR)
}

/// Parse the multi-valued genre cell. The result is never empty.
///
/// Attempts, first success wins:
/// 1. structured list → its elements
/// 2. null → `["Unknown"]`
/// 3. literal: bracketed list, tuple or set, a bare tuple (`'a', 'b'`), or one scalar
/// 4. comma-separated free text
/// 5. `["Unknown"]`
pub fn parse_genres(value: &RawValue) -> Vec<String> {
    genres_from(value).unwrap_or_else(|err| {
        log::trace!("genre cell unusable ({err}), defaulting");
        unknown_genres()
    })
}

// ---------------------------------------------------------------------------
// Field coercion
// ---------------------------------------------------------------------------

fn unknown_genres() -> Vec<String> {
    vec![UNKNOWN.to_string()]
}

fn text_field(value: Option<&RawValue>) -> String {
    match value {
        None | Some(RawValue::Null) => UNKNOWN.to_string(),
        Some(RawValue::String(s)) if s.trim().is_empty() => UNKNOWN.to_string(),
        Some(RawValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn year_from(value: &RawValue) -> Result<i32, FieldError> {
    let year = match value {
        RawValue::Integer(i) => *i,
        RawValue::Float(v) => truncate_year(*v)?,
        RawValue::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(i) => i,
                Err(_) => {
                    let v = s
                        .parse::<f64>()
                        .map_err(|_| FieldError::NotNumeric(s.to_string()))?;
                    truncate_year(v)?
                }
            }
        }
        RawValue::Null => return Err(FieldError::Null),
        other => return Err(FieldError::NotNumeric(other.to_string())),
    };
    i32::try_from(year)
        .ok()
        .filter(|y| *y >= 0)
        .ok_or_else(|| FieldError::NotNumeric(year.to_string()))
}

fn truncate_year(v: f64) -> Result<i64, FieldError> {
    if v.is_finite() {
        Ok(v.trunc() as i64)
    } else {
        Err(FieldError::NotNumeric(v.to_string()))
    }
}

fn genres_from(value: &RawValue) -> Result<Vec<String>, FieldError> {
    let tags = match value {
        RawValue::List(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                RawValue::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        RawValue::Null => return Err(FieldError::Null),
        RawValue::String(text) => match parse_literal(text) {
            Ok(Literal::Collection(items)) => items,
            Ok(Literal::Scalar(item)) => vec![item],
            Err(err) => {
                log::trace!("falling back to comma split: {err}");
                split_commas(text)
            }
        },
        other => split_commas(&other.to_string()),
    };

    let tags: Vec<String> = tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();
    if tags.is_empty() {
        Err(FieldError::Empty)
    } else {
        Ok(tags)
    }
}

fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Literal parser: bracketed lists of quoted strings and plain scalars
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
enum Literal {
    Scalar(String),
    Collection(Vec<String>),
}

fn parse_literal(text: &str) -> Result<Literal, FieldError> {
    let mut parser = LiteralParser { text, pos: 0 };
    parser.skip_ws();
    let literal = match parser.peek() {
        Some(open @ ('[' | '(' | '{')) => {
            parser.bump();
            let close = match open {
                '[' => ']',
                '(' => ')',
                _ => '}',
            };
            Literal::Collection(parser.items(Some(close))?)
        }
        _ => {
            let first = parser.scalar()?;
            parser.skip_ws();
            if parser.eat(',') {
                // bare tuple: `'a', 'b'`
                let mut items = vec![first];
                items.extend(parser.items(None)?);
                Literal::Collection(items)
            } else {
                Literal::Scalar(first)
            }
        }
    };
    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(parser.fail());
    }
    Ok(literal)
}

struct LiteralParser<'a> {
    text: &'a str,
    /// Byte offset of the next unread char.
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn fail(&self) -> FieldError {
        FieldError::NotLiteral(self.text.to_string())
    }

    /// Consume `close`, or with `None` check for end of input.
    fn closes(&mut self, close: Option<char>) -> bool {
        match close {
            Some(c) => self.eat(c),
            None => self.peek().is_none(),
        }
    }

    fn items(&mut self, close: Option<char>) -> Result<Vec<String>, FieldError> {
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.closes(close) {
                return Ok(items);
            }
            items.push(self.scalar()?);
            self.skip_ws();
            if self.closes(close) {
                return Ok(items);
            }
            if !self.eat(',') {
                return Err(self.fail());
            }
        }
    }

    fn scalar(&mut self) -> Result<String, FieldError> {
        match self.peek() {
            Some(quote @ ('\'' | '"')) => {
                self.bump();
                self.quoted(quote)
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() => self.keyword(),
            _ => Err(self.fail()),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, FieldError> {
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    let escaped = self.bump().ok_or_else(|| self.fail())?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '\\' | '\'' | '"' => out.push(escaped),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c if c == quote => return Ok(out),
                c => out.push(c),
            }
        }
        // unterminated
        Err(self.fail())
    }

    fn token(&mut self) -> &'a str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'))
        {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    fn number(&mut self) -> Result<String, FieldError> {
        let token = self.token();
        if token.parse::<i64>().is_ok() || is_float_literal(token) {
            Ok(token.to_string())
        } else {
            Err(self.fail())
        }
    }

    fn keyword(&mut self) -> Result<String, FieldError> {
        match self.token() {
            word @ ("True" | "False" | "None") => Ok(word.to_string()),
            _ => Err(self.fail()),
        }
    }
}

/// `2.5`, `1e5`, `.5`; rejects the `inf` / `nan` spellings `f64` also accepts.
fn is_float_literal(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    !lower.contains("inf") && !lower.contains("nan") && lower.parse::<f64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, RawValue)]) -> RawRecord {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn genres(text: &str) -> Vec<String> {
        parse_genres(&RawValue::from(text))
    }

    #[test]
    fn string_encoded_list() {
        assert_eq!(genres("['Drama', 'Comedy']"), vec!["Drama", "Comedy"]);
    }

    #[test]
    fn free_text_list() {
        assert_eq!(genres("Drama, Comedy"), vec!["Drama", "Comedy"]);
        assert_eq!(
            genres("International TV Shows, TV Dramas, TV Mysteries"),
            vec!["International TV Shows", "TV Dramas", "TV Mysteries"]
        );
    }

    #[test]
    fn null_and_missing_default_to_unknown() {
        assert_eq!(parse_genres(&RawValue::Null), vec!["Unknown"]);
        let rec = normalize_record(&row(&[("title", RawValue::from("A"))]));
        assert_eq!(rec.genres, vec!["Unknown"]);
    }

    #[test]
    fn empty_collections_default_to_unknown() {
        assert_eq!(genres("[]"), vec!["Unknown"]);
        assert_eq!(genres(" , ,  "), vec!["Unknown"]);
        assert_eq!(parse_genres(&RawValue::List(vec![])), vec!["Unknown"]);
        assert_eq!(genres("['  ', '']"), vec!["Unknown"]);
    }

    #[test]
    fn tuples_sets_and_scalars() {
        assert_eq!(genres("('Action',)"), vec!["Action"]);
        assert_eq!(genres("{'Horror', 'Thriller'}"), vec!["Horror", "Thriller"]);
        assert_eq!(genres("'Documentaries'"), vec!["Documentaries"]);
        assert_eq!(genres("[1, 2.5, True, None]"), vec!["1", "2.5", "True", "None"]);
    }

    #[test]
    fn bare_tuple_of_quoted_strings() {
        assert_eq!(genres("'Drama', 'Comedy'"), vec!["Drama", "Comedy"]);
        assert_eq!(genres("\"Kids' TV\", 'Anime Series',"), vec!["Kids' TV", "Anime Series"]);
        assert_eq!(genres("'Drama',, 'Comedy'"), vec!["'Drama'", "'Comedy'"]);
    }

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(
            genres(r#"["Kids' TV", 'Anime Series']"#),
            vec!["Kids' TV", "Anime Series"]
        );
        assert_eq!(genres(r"['It\'s Comedy']"), vec!["It's Comedy"]);
        assert_eq!(genres("['  Stand-Up Comedy  ']"), vec!["Stand-Up Comedy"]);
    }

    #[test]
    fn broken_literal_falls_back_to_comma_split() {
        assert_eq!(genres("['Drama', 'Comedy'"), vec!["['Drama'", "'Comedy'"]);
        assert_eq!(genres("[['nested']]"), vec!["[['nested']]"]);
        assert_eq!(genres("Dramas"), vec!["Dramas"]);
    }

    #[test]
    fn structured_list_used_element_wise() {
        let value = RawValue::List(vec![
            RawValue::from(" Dramas "),
            RawValue::Null,
            RawValue::Integer(7),
        ]);
        assert_eq!(parse_genres(&value), vec!["Dramas", "7"]);
    }

    #[test]
    fn non_string_scalar_is_split_as_text() {
        assert_eq!(parse_genres(&RawValue::Integer(5)), vec!["5"]);
    }

    #[test]
    fn year_coercion() {
        assert_eq!(coerce_year(&RawValue::Integer(2020)), 2020);
        assert_eq!(coerce_year(&RawValue::from("2020")), 2020);
        assert_eq!(coerce_year(&RawValue::from(" 2019.0 ")), 2019);
        assert_eq!(coerce_year(&RawValue::Float(2018.9)), 2018);
        assert_eq!(coerce_year(&RawValue::from("bad")), -1);
        assert_eq!(coerce_year(&RawValue::from("nan")), -1);
        assert_eq!(coerce_year(&RawValue::Null), -1);
        assert_eq!(coerce_year(&RawValue::Bool(true)), -1);
        assert_eq!(coerce_year(&RawValue::from("-3")), -1);
        assert_eq!(coerce_year(&RawValue::Integer(i64::MAX)), -1);
    }

    #[test]
    fn text_fields_default() {
        let rec = normalize_record(&row(&[
            ("type", RawValue::Null),
            ("country", RawValue::from("   ")),
            ("title", RawValue::Integer(1984)),
        ]));
        assert_eq!(rec.kind, "Unknown");
        assert_eq!(rec.country, "Unknown");
        assert_eq!(rec.title, "1984");
        assert_eq!(rec.release_year, -1);
    }

    #[test]
    fn missing_columns_are_reported() {
        let rows = vec![
            row(&[("title", RawValue::from("A")), ("type", RawValue::from("Movie"))]),
            row(&[("title", RawValue::from("B")), ("country", RawValue::from("Japan"))]),
        ];
        assert_eq!(missing_columns(&rows), vec!["release_year", "listed_in"]);
        assert!(missing_columns(&[]).is_empty());

        let records = normalize(&rows);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.release_year == -1));
        assert_eq!(records[1].kind, "Unknown");
    }
}
