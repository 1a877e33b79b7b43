use minifb::{Key, Window, WindowOptions};
use plotters::coord::{combinators::BindKeyPoints, Shift};
use plotters::prelude::*;
use thiserror::Error;
use tracing::warn;

use crate::{
    config::ChartConfig,
    day::{month_label, MONTH_STARTS},
    Climatology, DayOfYear, Record, Series,
};

pub const FIREBRICK: RGBColor = RGBColor(178, 34, 34);
pub const DODGERBLUE: RGBColor = RGBColor(30, 144, 255);
pub const LIGHTGRAY: RGBColor = RGBColor(211, 211, 211);
pub const MEDIUMBLUE: RGBColor = RGBColor(0, 0, 205);

const FONT: &str = "sans-serif";
const LINE_HEIGHT: i32 = 18;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Could not draw chart: {0}")]
    Drawing(String),
    #[error("Chart window failed: {0}")]
    Window(#[from] minifb::Error),
}

/// Where an annotation's text sits and the point its arrow touches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub day: i32,
    pub text_at: f32,
    pub point_at: f32,
}

pub fn annotation(series: &Series, config: &ChartConfig) -> Option<Annotation> {
    let day = DayOfYear::new(config.annotation_day)?;
    let &value = series.get(&day)?;
    Some(Annotation {
        day: day.get() as i32,
        text_at: value - config.annotation_drop,
        point_at: value,
    })
}

pub fn title(station: &str, climatology: &Climatology) -> String {
    format!(
        "Temperatures in {station}: {} vs. {}",
        climatology.baseline_label(),
        climatology.target_year
    )
}

fn points(series: &Series) -> impl Iterator<Item = (i32, f32)> + '_ {
    series
        .iter()
        .map(|(day, value)| (day.get() as i32, *value))
}

/// Outline of the band between the two baselines: highs left to right, then
/// lows back right to left, over the days both series share.
pub fn band(low: &Series, high: &Series) -> Vec<(i32, f32)> {
    let shared: Vec<_> = high
        .iter()
        .filter_map(|(day, &top)| {
            low.get(day)
                .map(|&bottom| (day.get() as i32, top, bottom))
        })
        .collect();

    shared
        .iter()
        .map(|&(day, top, _)| (day, top))
        .chain(shared.iter().rev().map(|&(day, _, bottom)| (day, bottom)))
        .collect()
}

/// Entries of the frameless lower-left legend for the record markers.
pub fn record_legend(year: i32) -> [(String, RGBColor); 2] {
    [
        (format!("{year} record highs"), RED),
        (format!("{year} record lows"), MEDIUMBLUE),
    ]
}

fn record_dots(
    records: &[Record],
    color: RGBColor,
) -> impl Iterator<Item = Circle<(i32, f32), i32>> + '_ {
    records.iter().map(move |record| {
        Circle::new(
            (record.day.get() as i32, record.value),
            3,
            color.filled(),
        )
    })
}

pub fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    station: &str,
    climatology: &Climatology,
    config: &ChartConfig,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;

    let span = climatology.baseline_label();
    let year = climatology.target_year;

    let mut chart = ChartBuilder::on(root)
        .caption(title(station, climatology), (FONT, 32).into_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(
            config
                .x_range
                .clone()
                .with_key_points(MONTH_STARTS.iter().map(|&day| day as i32).collect()),
            config.y_range.clone(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Months")
        .y_desc("Degrees Celsius (°C)")
        .axis_desc_style((FONT, 22))
        .label_style((FONT, 16))
        // plotters only rotates text in quarter turns, month labels stay level
        .x_label_formatter(&|day| month_label(*day as u16).to_string())
        .draw()?;

    chart.draw_series(std::iter::once(Polygon::new(
        band(&climatology.baseline_low, &climatology.baseline_high),
        LIGHTGRAY.mix(0.6).filled(),
    )))?;

    chart
        .draw_series(LineSeries::new(
            points(&climatology.baseline_high),
            FIREBRICK.mix(0.7).stroke_width(2),
        ))?
        .label(format!("Daily maximum temperatures (°C) in {span}"))
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], FIREBRICK.stroke_width(2))
        });

    chart
        .draw_series(LineSeries::new(
            points(&climatology.baseline_low),
            DODGERBLUE.mix(0.7).stroke_width(2),
        ))?
        .label(format!("Daily minimum temperatures (°C) in {span}"))
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], DODGERBLUE.stroke_width(2))
        });

    chart.draw_series(record_dots(&climatology.record_highs, RED))?;
    chart.draw_series(record_dots(&climatology.record_lows, MEDIUMBLUE))?;

    for (series, kind, color) in [
        (&climatology.baseline_high, "Maximum", FIREBRICK),
        (&climatology.baseline_low, "Minimum", DODGERBLUE),
    ] {
        let Some(note) = annotation(series, config) else {
            warn!(
                day = config.annotation_day,
                "no baseline value to annotate for {kind}"
            );
            continue;
        };

        chart.draw_series(std::iter::once(PathElement::new(
            vec![(note.day, note.text_at), (note.day, note.point_at)],
            color,
        )))?;
        chart.draw_series(std::iter::once(TriangleMarker::new(
            (note.day, note.point_at),
            5,
            color.filled(),
        )))?;

        let style = (FONT, 16).into_font().color(&color);
        let lines = [
            format!("{kind} daily"),
            "temperatures from".to_string(),
            span.clone(),
        ];
        chart.draw_series(lines.into_iter().enumerate().map(|(i, line)| {
            EmptyElement::at((note.day, note.text_at))
                + Text::new(line, (6, 4 + LINE_HEIGHT * i as i32), style.clone())
        }))?;
    }

    let summary = climatology.summary();
    let width = 9 * summary.chars().count() as i32;
    chart.draw_series(std::iter::once(
        EmptyElement::at(config.axes_fraction(0.02, 0.10))
            + Rectangle::new([(-4, -4), (width, LINE_HEIGHT)], WHITE.mix(0.8).filled())
            + Text::new(summary, (0, 0), (FONT, 16).into_font()),
    ))?;

    let legend_at = config.axes_fraction(0.02, 0.06);
    chart.draw_series(record_legend(year).into_iter().enumerate().map(
        |(i, (label, color))| {
            let row = LINE_HEIGHT * i as i32;
            EmptyElement::at(legend_at)
                + Circle::new((6, row + 8), 4, color.filled())
                + Text::new(label, (18, row), (FONT, 14).into_font())
        },
    ))?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 14))
        .draw()?;

    root.present()?;

    Ok(())
}

/// Draws the chart into an RGB buffer sized from `config`.
pub fn render_rgb(
    station: &str,
    climatology: &Climatology,
    config: &ChartConfig,
) -> Result<Vec<u8>, ChartError> {
    let (width, height) = config.pixel_size();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(&root, station, climatology, config)
            .map_err(|e| ChartError::Drawing(e.to_string()))?;
    }
    Ok(buffer)
}

/// Packs RGB triples into the `0RGB` words a window framebuffer expects.
pub fn to_window_pixels(rgb: &[u8]) -> Vec<u32> {
    rgb.chunks_exact(3)
        .map(|pixel| (pixel[0] as u32) << 16 | (pixel[1] as u32) << 8 | pixel[2] as u32)
        .collect()
}

/// Opens a window with the chart and blocks until it is closed or Escape is
/// pressed.
pub fn show(
    station: &str,
    climatology: &Climatology,
    config: &ChartConfig,
) -> Result<(), ChartError> {
    let (width, height) = config.pixel_size();
    let (width, height) = (width as usize, height as usize);
    let pixels = to_window_pixels(&render_rgb(station, climatology, config)?);

    let mut window = Window::new(
        &title(station, climatology),
        width,
        height,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&pixels, width, height)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(day: u16) -> DayOfYear {
        DayOfYear::new(day).unwrap()
    }

    #[test]
    fn annotation_sits_below_its_line() {
        let config = ChartConfig::default();
        let series = Series::from([(key(310), 21.5)]);
        assert_eq!(
            annotation(&series, &config),
            Some(Annotation {
                day: 310,
                text_at: -3.5,
                point_at: 21.5,
            })
        );
        assert_eq!(annotation(&Series::new(), &config), None);
    }

    #[test]
    fn record_markers_get_their_own_legend() {
        let entries = record_legend(2015);
        assert_eq!(entries[0], ("2015 record highs".to_string(), RED));
        assert_eq!(entries[1], ("2015 record lows".to_string(), MEDIUMBLUE));
    }

    #[test]
    fn window_pixels_pack_rgb_triples() {
        let rgb = [255, 0, 0, 1, 2, 3, 255, 255, 255];
        assert_eq!(to_window_pixels(&rgb), vec![0xFF0000, 0x010203, 0xFFFFFF]);
        assert!(to_window_pixels(&[]).is_empty());
    }

    #[test]
    fn band_goes_out_along_highs_and_back_along_lows() {
        let low = Series::from([(key(1), -5.0), (key(2), -6.0), (key(3), -7.0)]);
        let high = Series::from([(key(1), 5.0), (key(2), 6.0)]);
        assert_eq!(
            band(&low, &high),
            vec![(1, 5.0), (2, 6.0), (2, -6.0), (1, -5.0)]
        );
    }

    #[test]
    fn title_names_station_and_years() {
        let climatology = Climatology {
            target_year: 2015,
            baseline_years: 2005..=2014,
            baseline_low: Series::new(),
            baseline_high: Series::new(),
            target_low: Series::new(),
            target_high: Series::new(),
            record_lows: Vec::new(),
            record_highs: Vec::new(),
        };
        assert_eq!(
            title("Ann Arbor, Michigan", &climatology),
            "Temperatures in Ann Arbor, Michigan: 2005-2014 vs. 2015"
        );
    }
}
