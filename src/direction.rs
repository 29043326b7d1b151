//! Schedule annotation for a single direction.
//!
//! Lines are classified one by one into schedule rows, `days=` and `p=`
//! specifications, and city/station text. Once the whole direction is read,
//! every departure cell is bound to the circulation and feature codes of its
//! column.
//!
//! Stations and schedule rows carry no key linking them: the n-th station of
//! the direction, counting across all cities, takes the n-th schedule row.
//! Moving a station line without moving its row silently pairs the wrong
//! times with it.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use super::cities::{CityNameClassifier, CitySpot, parse_city_line};
use super::days::decode_days;
use super::error::{CompileError, DirectionFault, Snapshot};
use super::features::FeatureDecoder;
use super::utils::strip_bracket_tags;

static TIME_CELL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{1,2}:\d{2}").unwrap());

/// Cell meaning "no departure in this column".
pub const PLACEHOLDER: &str = "-";

/// Decoders shared by both directions of a line.
pub struct Annotator<'a> {
    pub default_circulation: &'a str,
    pub features: &'a FeatureDecoder,
    pub classifier: &'a dyn CityNameClassifier,
}

/// State accumulated while reading one direction.
///
/// A fresh context is built for every direction so nothing read in the
/// first one reaches the second.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionContext {
    /// 1-based position of the direction in the source
    pub index: usize,
    pub cities: Vec<CitySpot>,
    pub days: Vec<String>,
    pub features: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub max_width: usize,
    in_city_block: bool,
    last_line: Option<String>,
}

/// A direction whose rows have all been bound and paired with stations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedDirection {
    pub context: DirectionContext,
    /// Output text, starting with the `direction=` marker
    pub text: String,
}

impl DirectionContext {
    pub fn new(index: usize) -> Self {
        DirectionContext {
            index,
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            last_line: self.last_line.clone(),
            cities: self.cities.clone(),
            rows: self.rows.iter().map(|row| row.join(" ")).collect(),
        }
    }

    fn fail(&self, fault: impl Into<DirectionFault>) -> CompileError {
        CompileError::Direction {
            direction: self.index,
            fault: fault.into(),
            snapshot: Box::new(self.snapshot()),
        }
    }
}

impl Annotator<'_> {
    /// Reads, binds and renders one direction.
    pub fn annotate(
        &self,
        index: usize,
        lines: &[&str],
    ) -> Result<AnnotatedDirection, CompileError> {
        let mut ctx = DirectionContext::new(index);
        for line in lines {
            self.scan_line(&mut ctx, line)?;
        }
        debug!(
            direction = index,
            cities = ctx.cities.len(),
            rows = ctx.rows.len(),
            width = ctx.max_width,
            "direction scanned"
        );
        self.fill_default_days(&mut ctx);
        bind(&mut ctx)?;
        let text = render(&ctx)?;
        Ok(AnnotatedDirection { context: ctx, text })
    }

    /// Classifies one line and folds it into the context.
    pub fn scan_line(&self, ctx: &mut DirectionContext, line: &str) -> Result<(), CompileError> {
        if line.is_empty() {
            return Ok(());
        }
        ctx.last_line = Some(line.to_string());

        if TIME_CELL.is_match(line) {
            ctx.in_city_block = false;
            let cleaned = strip_bracket_tags(line).replace('*', "");
            let row: Vec<String> = cleaned.split_whitespace().map(str::to_string).collect();
            ctx.max_width = ctx.max_width.max(row.len());
            ctx.rows.push(row);
        } else if let Some(spec) = line.strip_prefix("days=") {
            ctx.in_city_block = false;
            ctx.days = decode_days(spec).map_err(|e| ctx.fail(e))?;
        } else if let Some(spec) = line.strip_prefix("p=") {
            ctx.in_city_block = false;
            if !spec.trim().is_empty() {
                ctx.features = self.features.decode(spec).map_err(|e| ctx.fail(e))?;
            }
        } else if let Some(text) = line.strip_prefix("c=") {
            ctx.in_city_block = true;
            parse_city_line(text, &mut ctx.cities, self.classifier).map_err(|e| ctx.fail(e))?;
        } else if ctx.in_city_block {
            parse_city_line(line, &mut ctx.cities, self.classifier).map_err(|e| ctx.fail(e))?;
        }
        Ok(())
    }

    /// Without a `days=` line every column runs on the line's circulation pattern.
    fn fill_default_days(&self, ctx: &mut DirectionContext) {
        if ctx.days.is_empty() {
            ctx.days = vec![self.default_circulation.to_string(); ctx.max_width];
        }
    }
}

/// Rewrites each departure cell as `<time>*<day code><feature code>*`.
pub fn bind(ctx: &mut DirectionContext) -> Result<(), CompileError> {
    for j in 0..ctx.rows.len() {
        let cells = ctx.rows[j].len();
        if cells > ctx.days.len() {
            return Err(ctx.fail(DirectionFault::RowTooWide {
                row: j + 1,
                cells,
                days: ctx.days.len(),
            }));
        }
        let annotated = annotate_row(&ctx.rows[j], &ctx.days, &ctx.features);
        ctx.rows[j] = annotated;
    }

    if ctx.max_width > ctx.days.len() {
        return Err(ctx.fail(DirectionFault::ScheduleWiderThanDays {
            width: ctx.max_width,
            days: ctx.days.len(),
        }));
    }
    Ok(())
}

/// Binds one row; `days` must hold at least one code per cell.
pub fn annotate_row(row: &[String], days: &[String], features: &[String]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(k, cell)| {
            if cell == PLACEHOLDER {
                return cell.clone();
            }
            let feature = features.get(k).map(String::as_str).unwrap_or("");
            format!("{cell}*{}{feature}*", days[k])
        })
        .collect()
}

/// Pairs stations with bound rows in flattened order and renders the direction.
fn render(ctx: &DirectionContext) -> Result<String, CompileError> {
    let mut text = String::from("\ndirection=\n");
    let mut rows = ctx.rows.iter();
    for spot in &ctx.cities {
        text.push_str(&format!("\ncity={}\n", spot.city));
        for station in &spot.stations {
            let Some(row) = rows.next() else {
                return Err(ctx.fail(DirectionFault::MissingSchedule {
                    city: spot.city.clone(),
                    station: station.clone(),
                }));
            };
            text.push_str(station);
            for cell in row {
                text.push(';');
                text.push_str(cell);
            }
            text.push('\n');
        }
    }

    let unused = rows.count();
    if unused > 0 {
        warn!(
            direction = ctx.index,
            unused, "schedule rows left without a station"
        );
    }
    Ok(text)
}
