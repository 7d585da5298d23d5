//! The raw disc title strings: the disc title and the group table packed into
//! one half-width and one full-width string.
//!
//! ```text
//! 0;Disc title//1-3;Side A//4;Bonus//
//! ０；ディスク／／１－３；Ａ面／／４；ボーナス／／
//! ```

use log::debug;

use crate::budget::{available_title_chars, cell_aligned, full_width_length, half_width_length};
use crate::common::kana::{remap_to_full_width, to_half_width};
use crate::error::{TocError, TocResult};
use crate::model::{Disc, TrackGroup};

const HALF_WIDTH_SEPARATOR: char = ';';
const HALF_WIDTH_TERMINATOR: &str = "//";
const FULL_WIDTH_SEPARATOR: char = '；';
const FULL_WIDTH_TERMINATOR: &str = "／／";
const DISC_TITLE_RANGE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTitles {
    pub half_width: String,
    pub full_width: String,
}

/// Serializes the disc title and as many groups as fit into the title table.
///
/// Groups are appended in track order until the next one would not fit; the
/// rest are left out. Returns `None` when even the bare disc title does not
/// fit, in which case nothing should be written.
pub fn compile_disc_titles(disc: &Disc) -> Option<RawTitles> {
    let use_full_width = disc.has_full_width_titles();
    let available = available_title_chars(&disc.with_blank_titles(), false);
    let cost = |raw: &RawTitles| {
        let mut cost = cell_aligned(half_width_length(&raw.half_width));
        if use_full_width {
            cost += cell_aligned(full_width_length(&raw.full_width));
        }
        cost
    };

    let mut raw = RawTitles {
        half_width: format!("{DISC_TITLE_RANGE}{HALF_WIDTH_SEPARATOR}{}{HALF_WIDTH_TERMINATOR}", disc.title),
        full_width: String::new(),
    };
    if use_full_width {
        raw.full_width = format!(
            "{}{FULL_WIDTH_SEPARATOR}{}{FULL_WIDTH_TERMINATOR}",
            remap_to_full_width(DISC_TITLE_RANGE),
            disc.full_width_title
        );
    }

    for (position, group) in disc.groups().iter().enumerate() {
        let range = group.range_token();
        let mut candidate = raw.clone();
        candidate.half_width.push_str(&format!(
            "{range}{HALF_WIDTH_SEPARATOR}{}{HALF_WIDTH_TERMINATOR}",
            group.title
        ));
        if use_full_width {
            candidate.full_width.push_str(&format!(
                "{}{FULL_WIDTH_SEPARATOR}{}{FULL_WIDTH_TERMINATOR}",
                remap_to_full_width(&range),
                group.full_width_title
            ));
        }

        if cost(&candidate) > available {
            debug!(
                "Title table full, dropping {} of {} groups",
                disc.groups().len() - position,
                disc.groups().len()
            );
            break;
        }
        raw = candidate;
    }

    if cost(&raw) > available {
        debug!("Disc title {:?} does not fit in the title table", disc.title);
        return None;
    }
    Some(raw)
}

/// What the raw title strings say about the disc.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTitles {
    pub title: String,
    pub full_width_title: String,
    pub groups: Vec<TrackGroup>,
}

/// Reads the raw disc title strings back into a disc title and group table.
/// A string without any terminator is a plain disc title.
pub fn parse_disc_titles(
    half_width: &str,
    full_width: &str,
    track_count: usize,
) -> TocResult<ParsedTitles> {
    let mut parsed = ParsedTitles::default();

    let half_width_segments = segments(half_width, HALF_WIDTH_TERMINATOR, HALF_WIDTH_SEPARATOR)?;
    match half_width_segments {
        None => parsed.title = half_width.to_string(),
        Some(segments) => {
            for (range, title) in segments {
                match parse_range(range, track_count)? {
                    None => parsed.title = title.to_string(),
                    Some((first, last)) => parsed.groups.push(TrackGroup::new(title, first, last)),
                }
            }
        }
    }

    let full_width_segments = segments(full_width, FULL_WIDTH_TERMINATOR, FULL_WIDTH_SEPARATOR)?;
    match full_width_segments {
        None => parsed.full_width_title = full_width.to_string(),
        Some(segments) => {
            for (range, title) in segments {
                let range = fold_range(range);
                match parse_range(&range, track_count)? {
                    None => parsed.full_width_title = title.to_string(),
                    Some((first, last)) => {
                        match parsed.groups.iter_mut().find(|g| g.first == first) {
                            Some(group) if group.last == last => {
                                group.full_width_title = title.to_string()
                            }
                            Some(_) => {
                                return Err(TocError::CorruptTitleTable(format!(
                                    "full-width group {range} does not match its half-width range"
                                )))
                            }
                            None => parsed
                                .groups
                                .push(TrackGroup::new("", first, last).with_full_width_title(title)),
                        }
                    }
                }
            }
        }
    }

    parsed.groups.sort_by_key(|group| group.first);
    for pair in parsed.groups.windows(2) {
        if pair[1].first <= pair[0].last {
            return Err(TocError::CorruptTitleTable(format!(
                "groups {} and {} overlap",
                pair[0].range_token(),
                pair[1].range_token()
            )));
        }
    }
    Ok(parsed)
}

type Segment<'a> = (&'a str, &'a str);

fn segments<'a>(
    raw: &'a str,
    terminator: &str,
    separator: char,
) -> TocResult<Option<Vec<Segment<'a>>>> {
    if !raw.contains(terminator) {
        return Ok(None);
    }
    raw.split(terminator)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment.split_once(separator).ok_or_else(|| {
                TocError::CorruptTitleTable(format!("segment {segment:?} has no track range"))
            })
        })
        .collect::<TocResult<Vec<_>>>()
        .map(Some)
}

/// Full-width digits and dash back to ASCII.
fn fold_range(range: &str) -> String {
    range
        .chars()
        .map(|c| to_half_width(c).map_or(c, |half| half.base))
        .collect()
}

/// `Ok(None)` for the disc title range, otherwise the 0-based inclusive
/// track range.
fn parse_range(range: &str, track_count: usize) -> TocResult<Option<(usize, usize)>> {
    if range == DISC_TITLE_RANGE {
        return Ok(None);
    }
    let corrupt = || TocError::CorruptTitleTable(format!("invalid track range {range:?}"));
    let number = |value: &str| value.trim().parse::<usize>().map_err(|_| corrupt());

    let (first, last) = match range.split_once('-') {
        Some((first, last)) => (number(first)?, number(last)?),
        None => {
            let track = number(range)?;
            (track, track)
        }
    };
    if first == 0 || last < first || last > track_count {
        return Err(corrupt());
    }
    Ok(Some((first - 1, last - 1)))
}
