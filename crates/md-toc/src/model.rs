use std::fmt;
use std::str::FromStr;

use crate::error::{TocError, TocResult};
use crate::groups::is_sequential;

/// Sound groups per second of audio.
pub const FRAMES_PER_SECOND: u64 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Sp,
    Lp2,
    Lp4,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Sp => "SP",
            Encoding::Lp2 => "LP2",
            Encoding::Lp4 => "LP4",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SP" => Ok(Encoding::Sp),
            "LP2" => Ok(Encoding::Lp2),
            "LP4" => Ok(Encoding::Lp4),
            _ => Err(format!("Unknown encoding: {value}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channels {
    #[default]
    Stereo,
    Mono,
}

impl Channels {
    pub fn name(self) -> &'static str {
        match self {
            Channels::Stereo => "stereo",
            Channels::Mono => "mono",
        }
    }
}

impl fmt::Display for Channels {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Channels {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stereo" => Ok(Channels::Stereo),
            "mono" => Ok(Channels::Mono),
            _ => Err(format!("Unknown channel mode: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Track {
    /// Position on the medium, 0-based.
    pub index: usize,
    pub title: String,
    pub full_width_title: String,
    pub duration_frames: u64,
    pub encoding: Encoding,
    pub channels: Channels,
    pub protected: bool,
}

impl Track {
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_full_width_title(mut self, title: impl Into<String>) -> Self {
        self.full_width_title = title.into();
        self
    }

    pub fn with_duration(mut self, frames: u64) -> Self {
        self.duration_frames = frames;
        self
    }
}

/// A named, contiguous run of tracks. `first` and `last` are inclusive
/// 0-based track indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackGroup {
    pub title: String,
    pub full_width_title: String,
    pub first: usize,
    pub last: usize,
}

impl TrackGroup {
    pub fn new(title: impl Into<String>, first: usize, last: usize) -> Self {
        Self {
            title: title.into(),
            full_width_title: String::new(),
            first,
            last,
        }
    }

    pub fn with_full_width_title(mut self, title: impl Into<String>) -> Self {
        self.full_width_title = title.into();
        self
    }

    pub fn len(&self) -> usize {
        (self.last + 1).saturating_sub(self.first)
    }

    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    /// 1-based track numbers as written to the title table: `5` or `5-7`.
    pub fn range_token(&self) -> String {
        if self.first == self.last {
            format!("{}", self.first + 1)
        } else {
            format!("{}-{}", self.first + 1, self.last + 1)
        }
    }
}

/// Content listing of a disc. Tracks are stored once; groups refer to them by
/// index so every view of a track sees the same data. Tracks not covered by
/// any group form the implicit ungrouped set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Disc {
    pub title: String,
    pub full_width_title: String,
    pub total_frames: u64,
    pub used_frames: u64,
    tracks: Vec<Track>,
    groups: Vec<TrackGroup>,
}

impl Disc {
    /// Builds a disc, checking that tracks are numbered `0..N` and that the
    /// groups partition them without overlap. Groups are kept in track order.
    pub fn new(
        title: impl Into<String>,
        tracks: Vec<Track>,
        mut groups: Vec<TrackGroup>,
    ) -> TocResult<Self> {
        for (position, track) in tracks.iter().enumerate() {
            if track.index != position {
                return Err(TocError::InvalidTrackIndex {
                    position,
                    index: track.index,
                });
            }
        }

        groups.sort_by_key(|group| group.first);
        let mut next_free = 0;
        for group in &groups {
            if group.is_empty() || group.last >= tracks.len() {
                return Err(TocError::GroupOutOfRange {
                    first: group.first,
                    last: group.last,
                    count: tracks.len(),
                });
            }
            if group.first < next_free {
                return Err(TocError::OverlappingGroups {
                    first: group.first,
                    last: group.last,
                });
            }
            next_free = group.last + 1;
        }

        Ok(Self {
            title: title.into(),
            full_width_title: String::new(),
            total_frames: 0,
            used_frames: 0,
            tracks,
            groups,
        })
    }

    pub fn with_full_width_title(mut self, title: impl Into<String>) -> Self {
        self.full_width_title = title.into();
        self
    }

    pub fn with_capacity(mut self, total_frames: u64, used_frames: u64) -> Self {
        self.total_frames = total_frames;
        self.used_frames = used_frames;
        self
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn groups(&self) -> &[TrackGroup] {
        &self.groups
    }

    pub fn track(&self, index: usize) -> TocResult<&Track> {
        self.tracks.get(index).ok_or(TocError::TrackOutOfRange {
            index,
            count: self.tracks.len(),
        })
    }

    pub fn group_of(&self, index: usize) -> Option<&TrackGroup> {
        self.groups.iter().find(|group| group.contains(index))
    }

    pub fn ungrouped_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks
            .iter()
            .filter(|track| self.group_of(track.index).is_none())
    }

    pub fn has_full_width_titles(&self) -> bool {
        !self.full_width_title.is_empty()
            || self.groups.iter().any(|g| !g.full_width_title.is_empty())
            || self.tracks.iter().any(|t| !t.full_width_title.is_empty())
    }

    /// Copy with both disc titles cleared, for measuring the room left for them.
    pub fn with_blank_titles(&self) -> Self {
        Self {
            title: String::new(),
            full_width_title: String::new(),
            ..self.clone()
        }
    }

    pub fn with_title(&self, title: &str, full_width_title: Option<&str>) -> Self {
        let mut disc = self.clone();
        disc.title = title.to_string();
        if let Some(full_width_title) = full_width_title {
            disc.full_width_title = full_width_title.to_string();
        }
        disc
    }

    pub fn with_track_title(
        &self,
        index: usize,
        title: &str,
        full_width_title: Option<&str>,
    ) -> TocResult<Self> {
        self.track(index)?;
        let mut disc = self.clone();
        let track = &mut disc.tracks[index];
        track.title = title.to_string();
        if let Some(full_width_title) = full_width_title {
            track.full_width_title = full_width_title.to_string();
        }
        Ok(disc)
    }

    /// Groups the selected tracks under a new name. The selection must be
    /// contiguous and must not touch an existing group.
    pub fn with_group(
        &self,
        indexes: &[usize],
        title: &str,
        full_width_title: &str,
    ) -> TocResult<Self> {
        let mut indexes = indexes.to_vec();
        indexes.sort_unstable();
        let (Some(&first), Some(&last)) = (indexes.first(), indexes.last()) else {
            return Err(TocError::EmptySelection);
        };
        self.track(last)?;

        if indexes.iter().any(|&index| self.group_of(index).is_some()) {
            return Err(TocError::TrackInTwoGroups);
        }
        if !is_sequential(&indexes) {
            return Err(TocError::NotSequential);
        }

        let mut groups = self.groups.clone();
        groups.push(TrackGroup::new(title, first, last).with_full_width_title(full_width_title));
        self.with_groups(groups)
    }

    pub fn without_group(&self, first: usize) -> TocResult<Self> {
        let position = self.group_position(first)?;
        let mut disc = self.clone();
        disc.groups.remove(position);
        Ok(disc)
    }

    pub fn with_group_renamed(
        &self,
        first: usize,
        title: &str,
        full_width_title: Option<&str>,
    ) -> TocResult<Self> {
        let position = self.group_position(first)?;
        let mut disc = self.clone();
        let group = &mut disc.groups[position];
        group.title = title.to_string();
        if let Some(full_width_title) = full_width_title {
            group.full_width_title = full_width_title.to_string();
        }
        Ok(disc)
    }

    /// Replaces the whole group table, validating it against the tracks.
    pub fn with_groups(&self, groups: Vec<TrackGroup>) -> TocResult<Self> {
        self.with_layout(self.tracks.clone(), groups)
    }

    /// Replaces the track list and the group table together.
    pub(crate) fn with_layout(
        &self,
        tracks: Vec<Track>,
        groups: Vec<TrackGroup>,
    ) -> TocResult<Self> {
        let disc = Disc::new(self.title.clone(), tracks, groups)?;
        Ok(Self {
            full_width_title: self.full_width_title.clone(),
            total_frames: self.total_frames,
            used_frames: self.used_frames,
            ..disc
        })
    }

    fn group_position(&self, first: usize) -> TocResult<usize> {
        self.groups
            .iter()
            .position(|group| group.first == first)
            .ok_or(TocError::GroupNotFound(first))
    }

    /// Flat listing sorted by track index, tagged with the owning group.
    pub fn sorted_tracks(&self) -> Vec<TrackRow<'_>> {
        self.tracks
            .iter()
            .map(|track| TrackRow {
                index: track.index,
                title: &track.title,
                group: self.group_of(track.index).map(|group| group.title.as_str()),
                encoding: track.encoding,
                duration: format_duration(track.duration_frames),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow<'a> {
    pub index: usize,
    pub title: &'a str,
    pub group: Option<&'a str>,
    pub encoding: Encoding,
    pub duration: String,
}

/// `m:ss`, or `h:mm:ss` past the hour.
pub fn format_duration(frames: u64) -> String {
    let seconds = frames / FRAMES_PER_SECOND;
    let (hours, minutes, seconds) = (seconds / 3600, (seconds / 60) % 60, seconds % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(count: usize) -> Vec<Track> {
        (0..count)
            .map(|i| Track::new(i, format!("Track {}", i + 1)))
            .collect()
    }

    #[test]
    fn range_tokens_are_one_based() {
        assert_eq!(TrackGroup::new("G", 4, 6).range_token(), "5-7");
        assert_eq!(TrackGroup::new("G", 0, 0).range_token(), "1");
    }

    #[test]
    fn rejects_misnumbered_tracks() {
        let mut list = tracks(3);
        list[2].index = 5;
        assert!(matches!(
            Disc::new("", list, vec![]),
            Err(TocError::InvalidTrackIndex { position: 2, index: 5 })
        ));
    }

    #[test]
    fn rejects_overlapping_groups() {
        let groups = vec![TrackGroup::new("A", 0, 2), TrackGroup::new("B", 2, 3)];
        assert!(matches!(
            Disc::new("", tracks(4), groups),
            Err(TocError::OverlappingGroups { first: 2, last: 3 })
        ));
    }

    #[test]
    fn rejects_groups_past_the_last_track() {
        let groups = vec![TrackGroup::new("A", 2, 4)];
        assert!(matches!(
            Disc::new("", tracks(4), groups),
            Err(TocError::GroupOutOfRange { .. })
        ));
    }

    #[test]
    fn groups_are_kept_in_track_order() {
        let groups = vec![TrackGroup::new("B", 3, 3), TrackGroup::new("A", 0, 1)];
        let disc = Disc::new("", tracks(4), groups).expect("valid disc");
        let titles: Vec<_> = disc.groups().iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        let ungrouped: Vec<_> = disc.ungrouped_tracks().map(|t| t.index).collect();
        assert_eq!(ungrouped, [2]);
    }

    #[test]
    fn grouping_requires_a_sequential_ungrouped_selection() {
        let disc = Disc::new("", tracks(6), vec![TrackGroup::new("A", 0, 1)]).expect("valid disc");

        assert!(matches!(
            disc.with_group(&[1, 2], "B", ""),
            Err(TocError::TrackInTwoGroups)
        ));
        assert!(matches!(
            disc.with_group(&[2, 4], "B", ""),
            Err(TocError::NotSequential)
        ));
        assert!(matches!(disc.with_group(&[], "B", ""), Err(TocError::EmptySelection)));
        assert!(matches!(
            disc.with_group(&[5, 6], "B", ""),
            Err(TocError::TrackOutOfRange { index: 6, count: 6 })
        ));

        let grouped = disc.with_group(&[4, 2, 3], "B", "Ｂ").expect("group created");
        assert_eq!(grouped.groups()[1], TrackGroup::new("B", 2, 4).with_full_width_title("Ｂ"));
        assert_eq!(disc.groups().len(), 1, "source disc is left untouched");
    }

    #[test]
    fn groups_can_be_renamed_and_removed() {
        let disc = Disc::new("", tracks(4), vec![TrackGroup::new("A", 1, 2)]).expect("valid disc");

        let renamed = disc.with_group_renamed(1, "Side A", None).expect("group exists");
        assert_eq!(renamed.groups()[0].title, "Side A");

        let removed = disc.without_group(1).expect("group exists");
        assert!(removed.groups().is_empty());
        assert!(matches!(disc.without_group(0), Err(TocError::GroupNotFound(0))));
    }

    #[test]
    fn renames_return_new_discs() {
        let disc = Disc::new("Old", tracks(2), vec![]).expect("valid disc");

        let renamed = disc.with_title("New", Some("ニュー"));
        assert_eq!(renamed.title, "New");
        assert_eq!(renamed.full_width_title, "ニュー");
        assert_eq!(renamed.with_title("Newer", None).full_width_title, "ニュー");

        let track = disc.with_track_title(1, "Renamed", None).expect("track exists");
        assert_eq!(track.tracks()[1].title, "Renamed");
        assert_eq!(disc.tracks()[1].title, "Track 2");
        assert!(matches!(
            disc.with_track_title(2, "Missing", None),
            Err(TocError::TrackOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn sorted_tracks_carry_group_titles() {
        let mut list = tracks(3);
        list[1].duration_frames = 185 * FRAMES_PER_SECOND;
        list[1].encoding = Encoding::Lp2;
        let disc = Disc::new("", list, vec![TrackGroup::new("Side A", 1, 2)]).expect("valid disc");

        let rows = disc.sorted_tracks();
        assert_eq!(rows[0].group, None);
        assert_eq!(rows[1].group, Some("Side A"));
        assert_eq!(rows[1].duration, "3:05");
        assert_eq!(rows[1].encoding.to_string(), "LP2");
    }

    #[test]
    fn durations_roll_over_to_hours() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(3725 * FRAMES_PER_SECOND), "1:02:05");
    }
}
