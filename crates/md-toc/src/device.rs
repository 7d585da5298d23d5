use log::debug;
use thiserror::Error;

use crate::budget::{CELL_BYTES, TITLE_CELLS};
use crate::error::TocResult;
use crate::model::{Disc, Track, FRAMES_PER_SECOND};
use crate::toc::{parse_disc_titles, RawTitles};

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("No track {0} on the disc")]
    NoSuchTrack(usize),

    #[error("Device rejected the command: {0}")]
    Rejected(String),
}

/// The calls the title logic needs from a player. Titles passed in are
/// already sanitized and, for the disc title, already compiled.
pub trait DeviceInterface {
    fn list_content(&mut self) -> TocResult<Disc>;
    fn set_disc_title(&mut self, raw: &str, full_width: bool) -> TocResult<()>;
    fn set_track_title(&mut self, index: usize, title: &str, full_width: bool) -> TocResult<()>;
    fn erase_track(&mut self, index: usize) -> TocResult<()>;
    fn move_track(&mut self, source: usize, target: usize) -> TocResult<()>;
}

const MOCK_TRACK_FRAMES: u64 = 5 * 60 * FRAMES_PER_SECOND;
const MOCK_TOTAL_FRAMES: u64 = 80 * 60 * FRAMES_PER_SECOND;
const MAX_RAW_TITLE_BYTES: usize = TITLE_CELLS * CELL_BYTES;

/// In-memory player holding tracks and the raw disc title strings.
#[derive(Debug, Clone)]
pub struct MockDevice {
    tracks: Vec<Track>,
    raw: RawTitles,
}

impl Default for MockDevice {
    fn default() -> Self {
        let tracks = (0..4)
            .map(|i| Track::new(i, format!("Mock Track {}", i + 1)).with_duration(MOCK_TRACK_FRAMES))
            .collect();
        Self {
            tracks,
            raw: RawTitles {
                half_width: "Mock Disc".to_string(),
                full_width: String::new(),
            },
        }
    }
}

impl MockDevice {
    pub fn new(tracks: Vec<Track>, raw: RawTitles) -> Self {
        let mut device = Self { tracks, raw };
        device.renumber();
        device
    }

    pub fn empty() -> Self {
        Self::new(vec![], RawTitles::default())
    }

    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
        self.renumber();
    }

    pub fn raw_titles(&self) -> &RawTitles {
        &self.raw
    }

    fn renumber(&mut self) {
        for (index, track) in self.tracks.iter_mut().enumerate() {
            track.index = index;
        }
    }

    fn check_track(&self, index: usize) -> TocResult<()> {
        if index >= self.tracks.len() {
            return Err(DeviceError::NoSuchTrack(index).into());
        }
        Ok(())
    }

    fn check_length(title: &str) -> TocResult<()> {
        if title.len() > MAX_RAW_TITLE_BYTES {
            return Err(DeviceError::Rejected(format!(
                "title of {} bytes does not fit the title table",
                title.len()
            ))
            .into());
        }
        Ok(())
    }
}

impl DeviceInterface for MockDevice {
    fn list_content(&mut self) -> TocResult<Disc> {
        let parsed = parse_disc_titles(&self.raw.half_width, &self.raw.full_width, self.tracks.len())?;
        let used_frames = self.tracks.iter().map(|t| t.duration_frames).sum();
        Ok(Disc::new(parsed.title, self.tracks.clone(), parsed.groups)?
            .with_full_width_title(parsed.full_width_title)
            .with_capacity(MOCK_TOTAL_FRAMES, used_frames))
    }

    fn set_disc_title(&mut self, raw: &str, full_width: bool) -> TocResult<()> {
        Self::check_length(raw)?;
        debug!("Mock disc title ({}): {raw:?}", if full_width { "full-width" } else { "half-width" });
        if full_width {
            self.raw.full_width = raw.to_string();
        } else {
            self.raw.half_width = raw.to_string();
        }
        Ok(())
    }

    fn set_track_title(&mut self, index: usize, title: &str, full_width: bool) -> TocResult<()> {
        self.check_track(index)?;
        Self::check_length(title)?;
        let track = &mut self.tracks[index];
        if full_width {
            track.full_width_title = title.to_string();
        } else {
            track.title = title.to_string();
        }
        Ok(())
    }

    fn erase_track(&mut self, index: usize) -> TocResult<()> {
        self.check_track(index)?;
        self.tracks.remove(index);
        self.renumber();
        Ok(())
    }

    fn move_track(&mut self, source: usize, target: usize) -> TocResult<()> {
        self.check_track(source)?;
        self.check_track(target)?;
        let track = self.tracks.remove(source);
        self.tracks.insert(target, track);
        self.renumber();
        Ok(())
    }
}
