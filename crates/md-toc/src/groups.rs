use std::borrow::Cow;

use log::debug;

use crate::error::{TocError, TocResult};
use crate::model::{Disc, Track, TrackGroup};

/// One row of the grouped track listing. Ungrouped runs are synthesized
/// between named groups and are never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group<'a> {
    Named {
        title: &'a str,
        full_width_title: &'a str,
        tracks: &'a [Track],
    },
    Ungrouped {
        tracks: &'a [Track],
    },
}

impl<'a> Group<'a> {
    pub fn tracks(&self) -> &'a [Track] {
        match *self {
            Group::Named { tracks, .. } | Group::Ungrouped { tracks } => tracks,
        }
    }

    pub fn title(&self) -> Option<&'a str> {
        match *self {
            Group::Named { title, .. } => Some(title),
            Group::Ungrouped { .. } => None,
        }
    }
}

/// Where a track goes in [`recompute_groups_after_track_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackTarget {
    Position(usize),
    Deleted,
}

/// Splits the disc into named groups and the ungrouped runs around them, in
/// track order.
pub fn decompose_for_display(disc: &Disc) -> Vec<Group<'_>> {
    let tracks = disc.tracks();
    let mut groups = Vec::with_capacity(disc.groups().len() * 2 + 1);
    let mut next = 0;

    for group in disc.groups() {
        if group.first > next {
            groups.push(Group::Ungrouped {
                tracks: &tracks[next..group.first],
            });
        }
        groups.push(Group::Named {
            title: &group.title,
            full_width_title: &group.full_width_title,
            tracks: &tracks[group.first..=group.last],
        });
        next = group.last + 1;
    }

    if next < tracks.len() {
        groups.push(Group::Ungrouped {
            tracks: &tracks[next..],
        });
    }
    groups
}

/// Moves or deletes the track at `source` and shifts the group boundaries that
/// lie between `source` and the target so every group keeps its tracks.
///
/// Deleting behaves like moving the track past the end of the disc and then
/// dropping it; tracks are renumbered afterwards and groups left empty vanish.
/// Callers deleting several tracks must go from the highest index down.
///
/// Only a move onto the same position hands back the input disc borrowed.
/// Any other move reorders the tracks, so it returns a new disc even when
/// every group boundary stays where it was.
pub fn recompute_groups_after_track_move(
    disc: &Disc,
    source: usize,
    target: TrackTarget,
) -> TocResult<Cow<'_, Disc>> {
    let count = disc.tracks().len();
    disc.track(source)?;

    let (target, offset) = match target {
        TrackTarget::Deleted => (count, -1),
        TrackTarget::Position(target) if target >= count => {
            return Err(TocError::TrackOutOfRange {
                index: target,
                count,
            })
        }
        TrackTarget::Position(target) if target == source => return Ok(Cow::Borrowed(disc)),
        TrackTarget::Position(target) if source > target => (target, 1),
        TrackTarget::Position(target) => (target, -1),
    };
    let deleting = target == count;
    let (low, high) = (source.min(target), source.max(target));

    let mut boundaries_changed = false;
    let mut bounds = Vec::with_capacity(disc.groups().len());
    for group in disc.groups() {
        let (mut start, mut end) = (group.first as isize, group.last as isize);
        if group.first > low && group.first <= high {
            start += offset;
            boundaries_changed = true;
        }
        if group.last >= low && group.last < high {
            end += offset;
            boundaries_changed = true;
        }
        bounds.push((group, start, end));
    }
    if !boundaries_changed {
        debug!("Moving track {source} leaves every group boundary in place");
    }

    let mut tracks = disc.tracks().to_vec();
    let moved = tracks.remove(source);
    if !deleting {
        tracks.insert(target, moved);
    }
    for (index, track) in tracks.iter_mut().enumerate() {
        track.index = index;
    }

    let last_index = tracks.len() as isize - 1;
    let groups = bounds
        .into_iter()
        .filter_map(|(group, start, end)| {
            let end = end.min(last_index);
            if start > end {
                debug!("Group {:?} lost its last track", group.title);
                return None;
            }
            Some(TrackGroup {
                first: start as usize,
                last: end as usize,
                ..group.clone()
            })
        })
        .collect();

    disc.with_layout(tracks, groups).map(Cow::Owned)
}

/// True when the sorted indexes have no gaps.
pub fn is_sequential(indexes: &[usize]) -> bool {
    indexes.windows(2).all(|pair| pair[1] == pair[0] + 1)
}
