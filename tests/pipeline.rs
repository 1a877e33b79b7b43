//! End-to-end runs of the load -> normalize -> aggregate -> compare pipeline
//! on small hand-written station extracts.

use record_temps::{chart, config::ChartConfig, Climatology, Dataset, DayOfYear};

fn key(day: u16) -> DayOfYear {
    DayOfYear::new(day).unwrap()
}

// Two stations, baseline 2005-2014 with leap years 2008 and 2012, target 2015.
const EXTRACT: &str = "ID,Date,Element,Data_Value
USW00094889,2008-02-29,TMAX,450
USW00094889,2008-02-29,TMIN,-400
USW00094889,2008-03-01,TMAX,120
USC00200032,2008-03-01,TMAX,90
USW00094889,2008-03-01,TMIN,-80
USW00094889,2009-03-01,TMAX,110
USW00094889,2009-03-01,TMIN,-120
USW00094889,2012-07-19,TMAX,340
USW00094889,2012-07-19,TMIN,150
USW00094889,2005-07-19,TMAX,310
USW00094889,2005-07-19,TMIN,120
USW00094889,2014-11-06,TMAX,150
USW00094889,2014-11-06,TMIN,-20
USW00094889,2014-11-06,PRCP,33
USW00094889,2015-03-01,TMAX,130
USC00200032,2015-03-01,TMAX,100
USW00094889,2015-03-01,TMIN,-120
USW00094889,2015-07-19,TMAX,350
USW00094889,2015-07-19,TMIN,160
USW00094889,2015-11-06,TMAX,150
USW00094889,2015-11-06,TMIN,-25
";

fn climatology() -> Climatology {
    let dataset: Dataset = EXTRACT.parse().expect("extract should parse");
    assert_eq!(dataset.skipped, 1);
    Climatology::compute(&dataset, 2015).expect("both groups are populated")
}

#[test]
fn leap_day_rows_are_left_out() {
    let climatology = climatology();
    // February 29th would otherwise show up as the hottest and coldest day.
    assert!(climatology.baseline_high.values().all(|&value| value < 45.0));
    assert!(climatology.baseline_low.values().all(|&value| value > -40.0));
    assert_eq!(climatology.baseline_high.len(), 3);
}

#[test]
fn march_first_from_leap_and_common_years_share_a_key() {
    let climatology = climatology();
    // 2008: 12.0 and 9.0 from two stations, 2009: 11.0.
    assert_eq!(climatology.baseline_high[&key(60)], 12.0);
    assert_eq!(climatology.baseline_low[&key(60)], -12.0);
    assert_eq!(climatology.target_high[&key(60)], 13.0);
}

#[test]
fn records_are_strict_and_aligned() {
    let climatology = climatology();

    // July 19th is key 200 in both 2012 and 2015.
    let highs: Vec<u16> = climatology
        .record_highs
        .iter()
        .map(|record| record.day.get())
        .collect();
    assert_eq!(highs, vec![60, 200]);
    assert_eq!(climatology.record_highs[1].value, 35.0);
    assert_eq!(climatology.record_highs[1].baseline, 34.0);

    // -12.0 on March 1st ties the baseline, November 6th is colder.
    let lows: Vec<u16> = climatology
        .record_lows
        .iter()
        .map(|record| record.day.get())
        .collect();
    assert_eq!(lows, vec![310]);

    assert_eq!(
        climatology.summary(),
        "2015 record days: 2 highs vs 1 lows"
    );
}

#[test]
fn annotation_day_resolves_against_the_baseline() {
    let climatology = climatology();
    let config = ChartConfig::default();

    let high = chart::annotation(&climatology.baseline_high, &config).unwrap();
    assert_eq!(high.day, 310);
    assert_eq!(high.point_at, 15.0);
    assert_eq!(high.text_at, -10.0);

    assert_eq!(
        chart::title("Ann Arbor, Michigan", &climatology),
        "Temperatures in Ann Arbor, Michigan: 2005-2014 vs. 2015"
    );
}

#[test]
fn leap_target_year_lines_up_with_the_baseline() {
    let extract = "ID,Date,Element,Data_Value
TMINX,2012-12-31,TMIN,-300
TMINX,2013-12-31,TMIN,-200
TMINX,2016-02-29,TMIN,-900
TMINX,2016-12-31,TMIN,-250
TMINX,2012-12-31,TMAX,10
TMINX,2016-12-31,TMAX,20
TMINX,2016-12-31,SNOW,40
";
    let dataset: Dataset = extract.parse().unwrap();
    assert_eq!(dataset.observations.len(), 6);
    assert_eq!(dataset.skipped, 1);

    let climatology = Climatology::compute(&dataset, 2016).unwrap();
    assert_eq!(climatology.baseline_low[&key(365)], -30.0);
    assert_eq!(climatology.target_low.len(), 1);
    assert_eq!(climatology.target_low[&key(365)], -25.0);
    assert!(climatology.record_lows.is_empty());
    assert_eq!(
        climatology.summary(),
        "2016 record days: 1 highs vs 0 lows"
    );
}
