use std::{fmt, ops::RangeInclusive, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Address of one physical seat, written `<row-letter>-<number>` (e.g. `A-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId {
    pub row: char,
    pub number: u16,
}

impl SeatId {
    pub fn new(row: char, number: u16) -> Self {
        Self { row, number }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed seat id {0:?}, expected <row>-<number>")]
pub struct SeatIdParseError(pub String);

impl FromStr for SeatId {
    type Err = SeatIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SeatIdParseError(s.to_string());
        let (row, number) = s.trim().split_once('-').ok_or_else(err)?;

        let mut chars = row.chars();
        let row = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
            _ => return Err(err()),
        };
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let number = number.parse::<u16>().map_err(|_| err())?;
        if number == 0 {
            return Err(err());
        }

        Ok(SeatId { row, number })
    }
}

impl Serialize for SeatId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatCategory {
    Superior,
    Prime,
    Classic,
}

impl SeatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatCategory::Superior => "SUPERIOR",
            SeatCategory::Prime => "PRIME",
            SeatCategory::Classic => "CLASSIC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRow {
    pub row: char,
    pub seats: RangeInclusive<u16>,
    pub category: SeatCategory,
    pub multiplier: Decimal,
}

impl SeatRow {
    pub fn contains(&self, number: u16) -> bool {
        self.seats.contains(&number)
    }

    pub fn len(&self) -> u32 {
        (*self.seats.end() as u32 + 1).saturating_sub(*self.seats.start() as u32)
    }
}

/// Static, read-only description of the auditorium. Rows are kept in
/// display order (back row first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    rows: Vec<SeatRow>,
}

impl SeatMap {
    pub fn new(rows: Vec<SeatRow>) -> Self {
        Self { rows }
    }

    /// The house layout: SUPERIOR at the back, PRIME in the middle,
    /// CLASSIC at the front.
    pub fn standard() -> Self {
        let superior = Decimal::new(15, 1);
        let prime = Decimal::new(12, 1);
        let classic = Decimal::ONE;

        let mut rows = vec![SeatRow {
            row: 'P',
            seats: 1..=20,
            category: SeatCategory::Superior,
            multiplier: superior,
        }];
        let bands = [
            ("NMLK", SeatCategory::Superior, superior),
            ("JHGFED", SeatCategory::Prime, prime),
            ("CBA", SeatCategory::Classic, classic),
        ];
        for (letters, category, multiplier) in bands {
            rows.extend(letters.chars().map(|row| SeatRow {
                row,
                seats: 1..=23,
                category,
                multiplier,
            }));
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[SeatRow] {
        &self.rows
    }

    pub fn row(&self, letter: char) -> Option<&SeatRow> {
        self.rows.iter().find(|r| r.row == letter)
    }

    /// Row of an addressable seat, `None` when the row or number is outside the map.
    pub fn locate(&self, seat: &SeatId) -> Option<&SeatRow> {
        self.row(seat.row).filter(|r| r.contains(seat.number))
    }

    pub fn contains(&self, seat: &SeatId) -> bool {
        self.locate(seat).is_some()
    }

    pub fn seat_count(&self) -> u32 {
        self.rows.iter().map(SeatRow::len).sum()
    }
}

impl Default for SeatMap {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_seat_ids() {
        assert_eq!("A-1".parse::<SeatId>().unwrap(), SeatId::new('A', 1));
        assert_eq!(" p-20 ".parse::<SeatId>().unwrap(), SeatId::new('P', 20));
        assert_eq!(SeatId::new('K', 7).to_string(), "K-7");
    }

    #[test]
    fn rejects_malformed_seat_ids() {
        for raw in ["", "A", "A-", "-1", "AA-1", "A-0", "A-x", "1-1", "A--1", "A-+1"] {
            assert!(raw.parse::<SeatId>().is_err(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn standard_map_matches_house_layout() {
        let map = SeatMap::standard();
        assert_eq!(map.rows().len(), 14);
        assert_eq!(map.rows()[0].row, 'P');
        assert_eq!(map.seat_count(), 20 + 13 * 23);

        assert!(map.contains(&SeatId::new('P', 20)));
        assert!(!map.contains(&SeatId::new('P', 21)));
        assert!(map.contains(&SeatId::new('A', 23)));
        assert!(!map.contains(&SeatId::new('Z', 99)));
        assert!(!map.contains(&SeatId::new('I', 1)));

        assert_eq!(map.row('H').unwrap().category, SeatCategory::Prime);
        assert_eq!(map.row('B').unwrap().multiplier, Decimal::ONE);
    }
}
