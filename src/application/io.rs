// Text formats for instances and tower lists
//
// Instance:            Solution:
//   # comment            # Penalty = 1234.567
//   <num cities>         <num towers>
//   <grid side>          <x> <y>
//   <service radius>     ...
//   <penalty radius>
//   <x> <y>
//   ...

use std::io::{BufRead, Write};
use std::num::ParseIntError;

use thiserror::Error;

use crate::domain::{Instance, InstanceError, Point, Solution, SERVICE_RADIUS};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of input: missing {0}")]
    MissingValue(&'static str),

    #[error("Invalid integer at line {line}: {value}")]
    InvalidInteger {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Line {line}: expected {expected} values, got {got}")]
    FieldCount {
        line: usize,
        expected: usize,
        got: usize,
    },

    #[error("Line {line}: count must be non-negative, got {value}")]
    NegativeCount { line: usize, value: i32 },

    #[error("Line {line}: service radius must be 3, got {value}")]
    UnsupportedServiceRadius { line: usize, value: i32 },

    #[error("Line {line}: unexpected data after the last point")]
    TrailingData { line: usize },

    #[error(transparent)]
    Instance(#[from] InstanceError),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Numbered lines with blanks and `#` comments removed
struct DataLines {
    lines: std::vec::IntoIter<(usize, String)>,
}

impl DataLines {
    fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            lines.push((i + 1, trimmed.to_string()));
        }
        Ok(Self {
            lines: lines.into_iter(),
        })
    }

    fn next_values(&mut self, what: &'static str, expected: usize) -> Result<(usize, Vec<i32>)> {
        let (line, text) = self.lines.next().ok_or(ParseError::MissingValue(what))?;
        let values = text
            .split_whitespace()
            .map(|token| {
                token.parse::<i32>().map_err(|source| ParseError::InvalidInteger {
                    line,
                    value: token.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<i32>>>()?;
        if values.len() != expected {
            return Err(ParseError::FieldCount {
                line,
                expected,
                got: values.len(),
            });
        }
        Ok((line, values))
    }

    fn next_int(&mut self, what: &'static str) -> Result<(usize, i32)> {
        let (line, values) = self.next_values(what, 1)?;
        Ok((line, values[0]))
    }

    fn next_count(&mut self, what: &'static str) -> Result<usize> {
        let (line, value) = self.next_int(what)?;
        usize::try_from(value).map_err(|_| ParseError::NegativeCount { line, value })
    }

    fn next_point(&mut self, what: &'static str) -> Result<Point> {
        let (_, values) = self.next_values(what, 2)?;
        Ok(Point::new(values[0], values[1]))
    }

    fn finish(mut self) -> Result<()> {
        match self.lines.next() {
            Some((line, _)) => Err(ParseError::TrailingData { line }),
            None => Ok(()),
        }
    }
}

pub fn read_instance<R: BufRead>(reader: R) -> Result<Instance> {
    let mut lines = DataLines::read(reader)?;
    let num_cities = lines.next_count("number of cities")?;
    let (_, side) = lines.next_int("grid side length")?;
    let (line, service_radius) = lines.next_int("service radius")?;
    if service_radius != SERVICE_RADIUS {
        return Err(ParseError::UnsupportedServiceRadius {
            line,
            value: service_radius,
        });
    }
    let (_, penalty_radius) = lines.next_int("penalty radius")?;

    let cities = (0..num_cities)
        .map(|_| lines.next_point("city coordinates"))
        .collect::<Result<Vec<Point>>>()?;
    lines.finish()?;

    Ok(Instance::new(side, penalty_radius, cities)?)
}

pub fn parse_instance(text: &str) -> Result<Instance> {
    read_instance(text.as_bytes())
}

pub fn write_instance<W: Write>(instance: &Instance, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", instance.cities().len())?;
    writeln!(writer, "{}", instance.grid_side_length())?;
    writeln!(writer, "{}", instance.service_radius())?;
    writeln!(writer, "{}", instance.penalty_radius())?;
    for city in instance.cities() {
        writeln!(writer, "{} {}", city.x, city.y)?;
    }
    writer.flush()
}

/// Tower list of a solution file; checking it against an instance is the
/// validator's job
pub fn read_towers<R: BufRead>(reader: R) -> Result<Vec<Point>> {
    let mut lines = DataLines::read(reader)?;
    let num_towers = lines.next_count("number of towers")?;
    let towers = (0..num_towers)
        .map(|_| lines.next_point("tower coordinates"))
        .collect::<Result<Vec<Point>>>()?;
    lines.finish()?;
    Ok(towers)
}

pub fn write_solution<W: Write>(
    solution: &Solution<'_>,
    penalty: Option<f64>,
    mut writer: W,
) -> std::io::Result<()> {
    if let Some(penalty) = penalty {
        writeln!(writer, "# Penalty = {:.3}", penalty)?;
    }
    writeln!(writer, "{}", solution.towers().len())?;
    for tower in solution.towers() {
        writeln!(writer, "{} {}", tower.x, tower.y)?;
    }
    writer.flush()
}
