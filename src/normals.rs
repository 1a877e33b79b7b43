//! Calendar-day normals and the days on which a target year broke them.

use std::{collections::BTreeMap, ops::RangeInclusive};

use thiserror::Error;
use tracing::debug;

use crate::{day::normalize_day_of_year, Dataset, DayOfYear, Element, Observation};

/// Degrees Celsius keyed by normalized day of year.
pub type Series = BTreeMap<DayOfYear, f32>;

impl Element {
    /// The extremum this element is aggregated with.
    pub fn reduce(self, left: f32, right: f32) -> f32 {
        match self {
            Element::Minimum => left.min(right),
            Element::Maximum => left.max(right),
        }
    }

    /// Strictly beyond the baseline, ties are not records.
    pub fn is_record(self, target: f32, baseline: f32) -> bool {
        match self {
            Element::Minimum => target < baseline,
            Element::Maximum => target > baseline,
        }
    }
}

fn aggregate<'a>(
    observations: impl IntoIterator<Item = &'a Observation>,
    element: Element,
    keep_year: impl Fn(i32) -> bool,
) -> Series {
    let mut series = Series::new();
    for observation in observations {
        if observation.element != element || !keep_year(observation.year()) {
            continue;
        }
        let Some(day) = normalize_day_of_year(observation.date) else {
            continue;
        };
        let value = observation.celsius();
        series
            .entry(day)
            .and_modify(|current| *current = element.reduce(*current, value))
            .or_insert(value);
    }
    series
}

/// Extremum per day over every year except `target_year`.
pub fn baseline_series<'a>(
    observations: impl IntoIterator<Item = &'a Observation>,
    element: Element,
    target_year: i32,
) -> Series {
    aggregate(observations, element, |year| year != target_year)
}

pub fn target_series<'a>(
    observations: impl IntoIterator<Item = &'a Observation>,
    element: Element,
    target_year: i32,
) -> Series {
    aggregate(observations, element, |year| year == target_year)
}

/// A target-year day that went beyond the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub day: DayOfYear,
    pub value: f32,
    pub baseline: f32,
}

/// Days present in both series where the target is a record, in day order.
pub fn find_records(baseline: &Series, target: &Series, element: Element) -> Vec<Record> {
    target
        .iter()
        .filter_map(|(&day, &value)| {
            let &baseline = baseline.get(&day)?;
            element.is_record(value, baseline).then_some(Record {
                day,
                value,
                baseline,
            })
        })
        .collect()
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalsError {
    #[error("No {0} observations outside of {1} to build a baseline from")]
    EmptyBaseline(Element, i32),
    #[error("No {0} observations in {1}")]
    EmptyTarget(Element, i32),
}

#[derive(Debug, Clone)]
pub struct Climatology {
    pub target_year: i32,
    /// First and last year that fed the baseline.
    pub baseline_years: RangeInclusive<i32>,

    pub baseline_low: Series,
    pub baseline_high: Series,
    pub target_low: Series,
    pub target_high: Series,

    pub record_lows: Vec<Record>,
    pub record_highs: Vec<Record>,
}

impl Climatology {
    pub fn compute(dataset: &Dataset, target_year: i32) -> Result<Self, NormalsError> {
        let build = |element: Element| -> Result<(Series, Series), NormalsError> {
            let baseline = baseline_series(dataset.of_element(element), element, target_year);
            if baseline.is_empty() {
                return Err(NormalsError::EmptyBaseline(element, target_year));
            }
            let target = target_series(dataset.of_element(element), element, target_year);
            if target.is_empty() {
                return Err(NormalsError::EmptyTarget(element, target_year));
            }
            debug!(
                %element,
                baseline_days = baseline.len(),
                target_days = target.len(),
                "aggregated series"
            );
            Ok((baseline, target))
        };

        let (baseline_low, target_low) = build(Element::Minimum)?;
        let (baseline_high, target_high) = build(Element::Maximum)?;

        let record_lows = find_records(&baseline_low, &target_low, Element::Minimum);
        let record_highs = find_records(&baseline_high, &target_high, Element::Maximum);

        // Both baselines are non-empty, so some year other than the target exists.
        let mut baseline_years = dataset
            .observations
            .iter()
            .map(Observation::year)
            .filter(|&year| year != target_year);
        let first = baseline_years.next().unwrap_or(target_year);
        let (first, last) = baseline_years.fold((first, first), |(low, high), year| {
            (low.min(year), high.max(year))
        });

        Ok(Self {
            target_year,
            baseline_years: first..=last,
            baseline_low,
            baseline_high,
            target_low,
            target_high,
            record_lows,
            record_highs,
        })
    }

    /// e.g. `2005-2014`
    pub fn baseline_label(&self) -> String {
        format!(
            "{}-{}",
            self.baseline_years.start(),
            self.baseline_years.end()
        )
    }

    pub fn summary(&self) -> String {
        format!(
            "{} record days: {} highs vs {} lows",
            self.target_year,
            self.record_highs.len(),
            self.record_lows.len()
        )
    }
}
