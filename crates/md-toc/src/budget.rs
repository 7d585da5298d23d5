//! Space accounting for the title table.
//!
//! The table holds 255 cells of 7 bytes. Every title (and the disc title
//! string that carries the group table) starts on a fresh cell, so each one is
//! rounded up to whole cells.

use crate::common::kana::{is_voiced_kana, remap_to_full_width};
use crate::model::Disc;
use crate::sanitize::truncate_chars;

pub const TITLE_CELLS: usize = 255;
pub const CELL_BYTES: usize = 7;

/// Longest full-width title handed out for a new track, in bytes.
const MAX_UPLOAD_FULL_WIDTH_BYTES: usize = 210;

/// Bytes a title takes in the half-width slot. Voiced kana are stored as base
/// plus mark and count twice.
pub fn half_width_length(title: &str) -> usize {
    title.chars().map(half_width_char_length).sum()
}

fn half_width_char_length(c: char) -> usize {
    if is_voiced_kana(c) {
        2
    } else {
        1
    }
}

/// Longest prefix of `title` whose [`half_width_length`] fits in `max`.
/// Voiced kana are kept or dropped whole.
pub(crate) fn truncate_half_width(title: &str, max: usize) -> &str {
    let mut used = 0;
    for (end, c) in title.char_indices() {
        used += half_width_char_length(c);
        if used > max {
            return &title[..end];
        }
    }
    title
}

/// Bytes a title takes in the full-width slot.
pub fn full_width_length(title: &str) -> usize {
    title.chars().count() * 2
}

pub fn cells_for_bytes(bytes: usize) -> usize {
    bytes.div_ceil(CELL_BYTES)
}

/// `bytes` rounded up to a whole number of cells.
pub fn cell_aligned(bytes: usize) -> usize {
    cells_for_bytes(bytes) * CELL_BYTES
}

/// Bytes still free in the title table, assuming the worst case for the disc
/// title string: both wrappers present and, with `include_groups`, a range
/// token for every named group.
pub fn available_title_chars(disc: &Disc, include_groups: bool) -> usize {
    let mut half_width = format!("0;{}//", disc.title);
    let mut full_width = format!("０；{}／／", disc.full_width_title);

    if include_groups {
        for group in disc.groups() {
            let token = format!("{}//", group.range_token());
            half_width.push_str(&group.title);
            half_width.push_str(&token);
            full_width.push_str(&group.full_width_title);
            full_width.push_str(&remap_to_full_width(&token));
        }
    }

    let mut used_cells = cells_for_bytes(half_width_length(&half_width))
        + cells_for_bytes(full_width_length(&full_width));
    for track in disc.tracks() {
        used_cells += cells_for_bytes(half_width_length(&track.title));
        used_cells += cells_for_bytes(full_width_length(&track.full_width_title));
    }

    TITLE_CELLS.saturating_sub(used_cells) * CELL_BYTES
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadTitles {
    pub title: String,
    pub full_width_title: String,
}

/// Hands out titles to a batch of tracks about to be written, shortening each
/// to whatever room is left and debiting it before the next one.
#[derive(Debug, Clone)]
pub struct UploadTitleBudget {
    available: usize,
    full_width: bool,
}

impl UploadTitleBudget {
    pub fn new(disc: &Disc, full_width: bool) -> Self {
        Self {
            available: available_title_chars(disc, true),
            full_width,
        }
    }

    pub fn available(&self) -> usize {
        self.available
    }

    pub fn allocate(&mut self, title: &str, full_width_title: &str) -> UploadTitles {
        let title = truncate_half_width(title, self.available).to_string();
        self.available = self
            .available
            .saturating_sub(cell_aligned(half_width_length(&title)));

        let mut allocated = UploadTitles {
            title,
            ..Default::default()
        };
        if self.full_width {
            let limit = full_width_length(full_width_title)
                .min(self.available)
                .min(MAX_UPLOAD_FULL_WIDTH_BYTES);
            allocated.full_width_title = truncate_chars(full_width_title, limit / 2).to_string();
            self.available = self
                .available
                .saturating_sub(cell_aligned(full_width_length(&allocated.full_width_title)));
        }
        allocated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Track, TrackGroup};

    fn disc_with_titles(titles: &[&str]) -> Disc {
        let tracks = titles
            .iter()
            .enumerate()
            .map(|(i, title)| Track::new(i, *title))
            .collect();
        Disc::new("", tracks, vec![]).expect("valid disc")
    }

    #[test]
    fn voiced_kana_count_twice() {
        assert_eq!(half_width_length("ガ"), 2);
        assert_eq!(half_width_length("ｶﾞ"), 2);
        assert_eq!(half_width_length("Abcパ"), 5);
        assert_eq!(full_width_length("ガギ"), 4);
    }

    #[test]
    fn cells_round_up() {
        assert_eq!(cells_for_bytes(0), 0);
        assert_eq!(cells_for_bytes(1), 1);
        assert_eq!(cells_for_bytes(7), 1);
        assert_eq!(cells_for_bytes(8), 2);
        assert_eq!(cell_aligned(8), 14);
    }

    #[test]
    fn empty_disc_only_pays_for_the_wrappers() {
        let disc = disc_with_titles(&[]);
        // "0;//" is one cell, "０；／／" two.
        assert_eq!(available_title_chars(&disc, true), (255 - 3) * 7);
    }

    #[test]
    fn track_titles_are_charged_per_cell() {
        let disc = disc_with_titles(&["12345678", "a"]);
        assert_eq!(available_title_chars(&disc, false), (255 - 3 - 2 - 1) * 7);
    }

    #[test]
    fn group_titles_count_only_when_requested() {
        let disc = disc_with_titles(&["", "", ""])
            .with_groups(vec![TrackGroup::new("Side A", 0, 1).with_full_width_title("Ａ")])
            .expect("valid groups");
        let without = available_title_chars(&disc, false);
        let with = available_title_chars(&disc, true);
        // "0;//Side A1-2//" = 15 bytes -> 3 cells, "０；／／Ａ１－２／／" = 20 bytes -> 3 cells.
        assert_eq!(without, (255 - 3) * 7);
        assert_eq!(with, (255 - 6) * 7);
    }

    #[test]
    fn adding_titles_never_frees_space() {
        let mut titles = vec![];
        let mut previous = available_title_chars(&disc_with_titles(&titles), true);
        for title in ["a", "bbbbbbbb", "ガギグ", ""] {
            titles.push(title);
            let current = available_title_chars(&disc_with_titles(&titles), true);
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn adding_groups_never_frees_space() {
        let disc = disc_with_titles(&["a", "b", "c", "d", "e"]);
        let mut previous = available_title_chars(&disc, true);
        let steps = [
            vec![TrackGroup::new("", 0, 0)],
            vec![TrackGroup::new("Side A", 0, 1)],
            vec![TrackGroup::new("Side A", 0, 1).with_full_width_title("ＡＢ")],
            vec![
                TrackGroup::new("Side A", 0, 1).with_full_width_title("ＡＢ"),
                TrackGroup::new("ガ", 3, 4),
            ],
            vec![
                TrackGroup::new("Side A", 0, 1).with_full_width_title("ＡＢ"),
                TrackGroup::new("ガ", 3, 4).with_full_width_title("ガギグゲゴ"),
            ],
        ];
        for groups in steps {
            let grouped = disc.with_groups(groups).expect("valid groups");
            let current = available_title_chars(&grouped, true);
            assert!(current <= previous);
            assert!(current <= available_title_chars(&grouped, false));
            previous = current;
        }
    }

    #[test]
    fn budget_never_goes_negative() {
        let long = "x".repeat(7 * 300);
        let disc = disc_with_titles(&[long.as_str()]);
        assert_eq!(available_title_chars(&disc, true), 0);
    }

    #[test]
    fn upload_titles_shrink_to_the_remaining_room() {
        let filler = "x".repeat(7 * 250);
        let disc = disc_with_titles(&[filler.as_str()]);
        let mut budget = UploadTitleBudget::new(&disc, false);
        // 255 - 3 wrapper cells - 250 filler cells.
        assert_eq!(budget.available(), 14);

        let first = budget.allocate("Twelve chars", "");
        assert_eq!(first.title, "Twelve chars");
        assert_eq!(budget.available(), 0);

        let second = budget.allocate("Anything", "");
        assert_eq!(second.title, "");
    }

    #[test]
    fn upload_full_width_titles_are_capped() {
        let disc = disc_with_titles(&[]);
        let mut budget = UploadTitleBudget::new(&disc, true);
        let long = "あ".repeat(200);
        let allocated = budget.allocate("short", &long);
        assert_eq!(allocated.full_width_title.chars().count(), 105);
        assert_eq!(budget.available(), (252 - 1 - 30) * 7);
    }

    #[test]
    fn upload_never_splits_a_voiced_kana_over_budget() {
        let filler = "x".repeat(7 * 251);
        let disc = disc_with_titles(&[filler.as_str()]);
        let mut budget = UploadTitleBudget::new(&disc, false);
        assert_eq!(budget.available(), 7);
        let allocated = budget.allocate("ｱｲｳｴｵｶガ", "");
        assert_eq!(allocated.title, "ｱｲｳｴｵｶ");
    }
}
