use std::{fmt, num::ParseIntError, ops::RangeInclusive, path::Path, str::FromStr};

use logos::Logos;
use thiserror::Error;
use time::{Date, Month};

pub mod chart;
pub mod config;
pub mod day;
pub mod normals;

pub use day::{normalize_day_of_year, DayOfYear};
pub use normals::{Climatology, Record, Series};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Ignore this regex pattern between tokens
enum Token {
    #[token(",")]
    Comma,

    #[regex(r"[0-9]{4}-[0-9]{2}-[0-9]{2}")]
    Date,

    #[token("TMIN")]
    Tmin,
    #[token("TMAX")]
    Tmax,

    #[regex(r"-?[0-9]+")]
    Number,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
}

const DATE_COLUMN: &str = "Date";
const ELEMENT_COLUMN: &str = "Element";
const VALUE_COLUMN: &str = "Data_Value";

/// Which daily extreme a row measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Minimum,
    Maximum,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Minimum => write!(f, "TMIN"),
            Element::Maximum => write!(f, "TMAX"),
        }
    }
}

/// Raw station values are integers in tenths of a degree Celsius.
pub fn to_celsius(tenths: i32) -> f32 {
    tenths as f32 / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub date: Date,
    pub element: Element,
    pub tenths: i32,
}

impl Observation {
    pub fn celsius(&self) -> f32 {
        to_celsius(self.tenths)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub observations: Vec<Observation>,
    /// Rows measuring something other than TMIN/TMAX.
    pub skipped: usize,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing header")]
    MissingHeader,
    #[error("Missing column `{0}` in header")]
    MissingColumn(&'static str),
    #[error("Line {line}: {source}")]
    Row {
        line: usize,
        #[source]
        source: ParseRowError,
    },
}

#[derive(Debug, Error)]
pub enum ParseRowError {
    #[error("Missing field `{0}`")]
    MissingField(&'static str),
    #[error("Bad date: `{0}`")]
    BadDate(String),
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] time::error::ComponentRange),
    #[error("Bad element: `{0}`")]
    BadElement(String),
    #[error("Bad value `{text}`: {source}")]
    BadValue {
        text: String,
        #[source]
        source: ParseIntError,
    },
    #[error("Bad value: `{0}`")]
    NotANumber(String),
}

/// How the lexer saw a single comma-separated field.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldKind {
    Empty,
    Single(Token),
    Mixed,
}

#[derive(Debug, Clone, Copy)]
struct Field<'a> {
    kind: FieldKind,
    text: &'a str,
}

fn split_fields(line: &str) -> Vec<Field<'_>> {
    let mut fields = Vec::new();
    let mut lexer = Token::lexer(line);
    let mut start = 0;
    let mut kind = FieldKind::Empty;

    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::Comma) => {
                let end = lexer.span().start;
                fields.push(Field {
                    kind,
                    text: line[start..end].trim(),
                });
                start = lexer.span().end;
                kind = FieldKind::Empty;
            }
            Ok(token) => {
                kind = match kind {
                    FieldKind::Empty => FieldKind::Single(token),
                    _ => FieldKind::Mixed,
                }
            }
            Err(()) => kind = FieldKind::Mixed,
        }
    }
    fields.push(Field {
        kind,
        text: line[start..].trim(),
    });

    fields
}

/// Positions of the columns we read, taken from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    date: usize,
    element: usize,
    value: usize,
}

impl Columns {
    fn parse(header: &str) -> Result<Self, ParseError> {
        let names: Vec<&str> = split_fields(header).iter().map(|field| field.text).collect();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|column| *column == name)
                .ok_or(ParseError::MissingColumn(name))
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            element: find(ELEMENT_COLUMN)?,
            value: find(VALUE_COLUMN)?,
        })
    }
}

fn parse_date(s: &str) -> Result<Date, ParseRowError> {
    let bad_date = || ParseRowError::BadDate(s.to_string());
    let mut parts = s.splitn(3, '-');
    let mut next = || -> Result<i32, ParseRowError> {
        parts
            .next()
            .and_then(|part| part.parse().ok())
            .ok_or_else(bad_date)
    };

    let year = next()?;
    let month = u8::try_from(next()?).map_err(|_| bad_date())?;
    let day = u8::try_from(next()?).map_err(|_| bad_date())?;

    Ok(Date::from_calendar_date(year, Month::try_from(month)?, day)?)
}

impl Observation {
    /// `Ok(None)` means the row is well formed but measures another element.
    fn parse(columns: Columns, line: &str) -> Result<Option<Self>, ParseRowError> {
        let fields = split_fields(line);
        let field = |index: usize, name: &'static str| {
            fields
                .get(index)
                .copied()
                .ok_or(ParseRowError::MissingField(name))
        };

        let element = field(columns.element, ELEMENT_COLUMN)?;
        let element = match element.kind {
            FieldKind::Single(Token::Tmin) => Element::Minimum,
            FieldKind::Single(Token::Tmax) => Element::Maximum,
            FieldKind::Single(Token::Word) => return Ok(None),
            _ => return Err(ParseRowError::BadElement(element.text.to_string())),
        };

        let date = field(columns.date, DATE_COLUMN)?;
        let date = match date.kind {
            FieldKind::Single(Token::Date) => parse_date(date.text)?,
            _ => return Err(ParseRowError::BadDate(date.text.to_string())),
        };

        let value = field(columns.value, VALUE_COLUMN)?;
        let tenths = match value.kind {
            FieldKind::Single(Token::Number) => {
                value
                    .text
                    .parse()
                    .map_err(|source| ParseRowError::BadValue {
                        text: value.text.to_string(),
                        source,
                    })?
            }
            _ => return Err(ParseRowError::NotANumber(value.text.to_string())),
        };

        Ok(Some(Self {
            date,
            element,
            tenths,
        }))
    }
}

impl FromStr for Dataset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines().enumerate().filter(|(_, line)| !line.trim().is_empty());
        let (_, header) = lines.next().ok_or(ParseError::MissingHeader)?;
        let columns = Columns::parse(header)?;

        let mut dataset = Dataset::default();
        for (index, line) in lines {
            match Observation::parse(columns, line) {
                Ok(Some(observation)) => dataset.observations.push(observation),
                Ok(None) => dataset.skipped += 1,
                Err(source) => {
                    return Err(ParseError::Row {
                        line: index + 1,
                        source,
                    })
                }
            }
        }

        Ok(dataset)
    }
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        content.parse()
    }

    pub fn of_element(&self, element: Element) -> impl Iterator<Item = &Observation> {
        self.observations
            .iter()
            .filter(move |observation| observation.element == element)
    }

    /// Inclusive span of years present, `None` when there are no observations.
    pub fn years(&self) -> Option<RangeInclusive<i32>> {
        let first = self.observations.iter().map(Observation::year).min()?;
        let last = self.observations.iter().map(Observation::year).max()?;
        Some(first..=last)
    }
}
