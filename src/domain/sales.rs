//! Sales dataset keys and row filtering for the linked chart.

use std::fmt;

use serde::Serialize;
use tracing::warn;

/// Quarter-year placeholder in the sales dataset; never plotted.
pub const PARTIAL_PERIOD_MARKER: &str = "(3 Months)";

/// Granularity of the chart's y-domain.
const Y_STEP: i64 = 10_000;

/// Sales dataset column backing a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesCategory {
    VerticalPianos,
    GrandPianos,
    Electronic,
    PneumaticPlayers,
}

impl SalesCategory {
    /// Map a tree-node display name to its dataset column.
    pub fn from_display_name(name: &str) -> Option<Self> {
        match name {
            "Modern upright piano" => Some(Self::VerticalPianos),
            "Grand Piano" => Some(Self::GrandPianos),
            "Electric Piano" => Some(Self::Electronic),
            "Player Piano" => Some(Self::PneumaticPlayers),
            _ => None,
        }
    }

    /// Column header in the sales dataset.
    pub fn column(&self) -> &'static str {
        match self {
            Self::VerticalPianos => "VERTICAL PIANOS",
            Self::GrandPianos => "GRAND PIANOS",
            Self::Electronic => "ELECTRONIC",
            Self::PneumaticPlayers => "PNEUMATIC PLAYERS",
        }
    }
}

impl fmt::Display for SalesCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Result of translating a selected node into a sales lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetLookup {
    Key(SalesCategory),
    NoData,
}

impl DatasetLookup {
    pub fn for_name(name: &str) -> Self {
        SalesCategory::from_display_name(name)
            .map(Self::Key)
            .unwrap_or(Self::NoData)
    }
}

/// One raw dataset row as delivered by a sales provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRow {
    pub year: i32,
    pub raw: String,
}

impl SalesRow {
    pub fn new(year: i32, raw: impl Into<String>) -> Self {
        Self {
            year,
            raw: raw.into(),
        }
    }
}

/// Chart point: units sold in a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalesPoint {
    pub year: i32,
    pub count: i64,
}

/// Ordered, filtered sales history for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SalesSeries {
    pub points: Vec<SalesPoint>,
}

impl SalesSeries {
    /// Drop blank and partial-period rows, parse the rest in order.
    pub fn from_rows(rows: &[SalesRow]) -> Self {
        let points = rows
            .iter()
            .filter_map(|row| {
                let value = row.raw.trim();
                if value.is_empty() || value == PARTIAL_PERIOD_MARKER {
                    return None;
                }
                match parse_count(value) {
                    Some(count) => Some(SalesPoint {
                        year: row.year,
                        count,
                    }),
                    None => {
                        warn!("skipping unparseable sales value {:?} for {}", row.raw, row.year);
                        None
                    }
                }
            })
            .collect();
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Largest count rounded up to the next multiple of 10 000; chart y-domain.
    ///
    /// Saturates at the largest count when rounding up would overflow.
    pub fn y_ceiling(&self) -> i64 {
        let max = self.points.iter().map(|p| p.count).max().unwrap_or(0);
        if max <= 0 {
            return 0;
        }
        let steps = max / Y_STEP + i64::from(max % Y_STEP != 0);
        steps.checked_mul(Y_STEP).unwrap_or(max)
    }
}

/// What the linked chart is asked to draw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartUpdate {
    /// Display name of the selected instrument
    pub name: String,
    pub series: SalesSeries,
}

impl ChartUpdate {
    pub fn new(name: impl Into<String>, series: SalesSeries) -> Self {
        Self {
            name: name.into(),
            series,
        }
    }

    /// Explicit empty state for instruments without a sales dataset.
    pub fn no_data(name: impl Into<String>) -> Self {
        Self::new(name, SalesSeries::default())
    }

    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }
}

/// Count with thousands separators stripped.
pub fn parse_count(value: &str) -> Option<i64> {
    parse_int_prefix(&value.replace(',', ""))
}

/// Integer prefix of `value`: optional sign then digits, trailing text ignored.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let value = value.trim();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
