use std::{fs, io::Read};

use tsp_hs_derive::{CliValue, KvDisplay};

use crate::{City, Error, Result, SolverOptions};

/// How the first city of the input is obtained.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, CliValue)]
#[cli_value(option = "first-city")]
pub enum FirstCity {
    /// Every one of the N cities has its own record.
    #[default]
    Read,
    /// Reference layout: city 0 sits at the origin and only N-1 records follow.
    Origin,
}

/// Cities loaded for a run, plus where they came from.
#[derive(Clone, Debug, KvDisplay)]
pub struct SolverInput {
    pub(crate) source: String,
    pub(crate) first_city: FirstCity,
    #[kv(fmt = "len")]
    pub(crate) cities: Vec<City>,
}

impl SolverInput {
    pub fn from_options(options: &SolverOptions) -> Result<Self> {
        let (source, text) = match options.input_path() {
            Some(path) => (path.display().to_string(), fs::read_to_string(path)?),
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                (String::from("stdin"), text)
            }
        };
        Self::parse(source, &text, options.first_city)
    }

    pub fn parse(source: impl Into<String>, text: &str, first_city: FirstCity) -> Result<Self> {
        Ok(Self {
            source: source.into(),
            first_city,
            cities: parse_cities(text, first_city)?,
        })
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn into_cities(self) -> Vec<City> {
        self.cities
    }
}

/// Parses a city count followed by `x y name` records, skipping blank lines.
fn parse_cities(text: &str, first_city: FirstCity) -> Result<Vec<City>> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let Some((line_no, count_line)) = lines.next() else {
        return Err(Error::invalid_input("No cities provided."));
    };
    let count: usize = count_line.parse().map_err(|_| {
        Error::invalid_input(format!("Line {line_no}: invalid city count: {count_line}"))
    })?;

    let expected = match first_city {
        FirstCity::Read => count,
        FirstCity::Origin => count.saturating_sub(1),
    };
    let records = lines
        .map(|(line_no, line)| parse_record(line_no, line))
        .collect::<Result<Vec<_>>>()?;
    if records.len() != expected {
        return Err(Error::invalid_data(format!(
            "Expected {expected} city records for count {count}, found {}",
            records.len()
        )));
    }

    let mut cities = Vec::with_capacity(count);
    if first_city == FirstCity::Origin && count > 0 {
        cities.push(City::origin());
    }
    cities.extend(records);
    Ok(cities)
}

fn parse_record(line_no: usize, line: &str) -> Result<City> {
    let mut fields = line.split_whitespace();
    let mut coordinate = |axis: &str| -> Result<f64> {
        let raw = fields
            .next()
            .ok_or_else(|| Error::invalid_input(format!("Line {line_no}: missing {axis}")))?;
        let value: f64 = raw.parse().map_err(|_| {
            Error::invalid_input(format!("Line {line_no}: invalid {axis}: {raw}"))
        })?;
        if !value.is_finite() {
            return Err(Error::invalid_data(format!(
                "Line {line_no}: {axis} must be finite, got {raw}"
            )));
        }
        Ok(value)
    };
    let x = coordinate("x")?;
    let y = coordinate("y")?;

    let name = fields
        .next()
        .ok_or_else(|| Error::invalid_input(format!("Line {line_no}: missing city name")))?;
    if fields.next().is_some() {
        return Err(Error::invalid_input(format!(
            "Line {line_no}: expected 'x y name' but got extra fields: {line}"
        )));
    }

    Ok(City::new(name, x, y))
}

#[cfg(test)]
mod tests {
    use super::{FirstCity, SolverInput, parse_cities};
    use crate::Error;

    #[test]
    fn parse_cities_reads_count_then_records() {
        let cities = parse_cities("3\n65.6478 68.3254 Cid1\n1 2 Cid2\n-3.5 0 Cid3\n", FirstCity::Read)
            .expect("parse cities");

        assert_eq!(cities.len(), 3);
        assert_eq!(cities[0].name(), "Cid1");
        assert_eq!((cities[0].x, cities[0].y), (65.6478, 68.3254));
        assert_eq!(cities[2].to_string(), "-3.5 0.0 Cid3");
    }

    #[test]
    fn parse_cities_skips_blank_lines_and_surrounding_space() {
        let cities = parse_cities("\n  2 \n\n 0 0 a \n\t1 1 b\n\n", FirstCity::Read)
            .expect("parse cities");
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[1].name(), "b");
    }

    #[test]
    fn origin_layout_places_first_city_at_zero() {
        let cities =
            parse_cities("3\n4 5 b\n6 7 c\n", FirstCity::Origin).expect("parse cities");

        assert_eq!(cities.len(), 3);
        assert_eq!(cities[0].name(), "origin");
        assert_eq!((cities[0].x, cities[0].y), (0.0, 0.0));
        assert_eq!(cities[1].name(), "b");
    }

    #[test]
    fn origin_layout_with_zero_count_is_empty() {
        let cities = parse_cities("0\n", FirstCity::Origin).expect("parse cities");
        assert!(cities.is_empty());
    }

    #[test]
    fn parse_cities_rejects_empty_input() {
        let err = parse_cities(" \n\t ", FirstCity::Read).expect_err("empty input should fail");
        assert!(err.to_string().contains("No cities provided."));
    }

    #[test]
    fn parse_cities_rejects_bad_count() {
        let err = parse_cities("many\n1 2 a\n", FirstCity::Read).expect_err("bad count");
        assert!(err.to_string().contains("Line 1: invalid city count: many"));
    }

    #[test]
    fn parse_cities_rejects_record_count_mismatch() {
        let err = parse_cities("3\n1 2 a\n3 4 b\n", FirstCity::Read).expect_err("too few records");
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("Expected 3 city records for count 3, found 2"));

        let err = parse_cities("2\n1 2 a\n3 4 b\n", FirstCity::Origin)
            .expect_err("origin layout reads one record fewer");
        assert!(err.to_string().contains("Expected 1 city records for count 2, found 2"));
    }

    #[test]
    fn parse_cities_rejects_non_numeric_coordinates() {
        let err = parse_cities("1\n1 north a\n", FirstCity::Read).expect_err("invalid y");
        assert!(err.to_string().contains("Line 2: invalid y: north"));
    }

    #[test]
    fn parse_cities_rejects_non_finite_coordinates() {
        let err = parse_cities("1\ninf 0 a\n", FirstCity::Read).expect_err("infinite x");
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("x must be finite"));
    }

    #[test]
    fn parse_cities_rejects_missing_name_and_extra_fields() {
        let err = parse_cities("1\n1 2\n", FirstCity::Read).expect_err("missing name");
        assert!(err.to_string().contains("Line 2: missing city name"));

        let err = parse_cities("1\n1 2 a b\n", FirstCity::Read).expect_err("extra fields");
        assert!(err.to_string().contains("expected 'x y name'"));
    }

    #[test]
    fn parse_cities_rejects_missing_coordinate() {
        let err = parse_cities("1\n5\n", FirstCity::Read).expect_err("missing y");
        assert!(err.to_string().contains("Line 2: missing y"));
    }

    #[test]
    fn solver_input_displays_source_and_city_count() {
        let input = SolverInput::parse("points.txt", "2\n0 0 a\n1 1 b\n", FirstCity::Read)
            .expect("parse input");
        let rendered = input.to_string();
        assert!(rendered.contains("source     = points.txt"));
        assert!(rendered.contains("first_city = read"));
        assert!(rendered.contains("cities     = 2"));
    }

    #[test]
    fn first_city_parses_cli_values() {
        assert_eq!(FirstCity::parse("origin").expect("parse"), FirstCity::Origin);
        assert_eq!(FirstCity::parse("READ").expect("parse"), FirstCity::Read);
        let err = FirstCity::parse("skip").expect_err("unknown value");
        assert!(
            err.to_string()
                .contains("Invalid value for --first-city: skip (expected read|origin)")
        );
    }
}
