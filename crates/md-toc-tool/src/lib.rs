use log::debug;
use md_toc::{
    available_title_chars, compile_disc_titles, decompose_for_display,
    escape_full_width_title_delimiters, escape_title_delimiters, is_sequential,
    sanitize_full_width, sanitize_half_width, Channels, DeviceInterface, Disc, Encoding, Group,
    MockDevice, RawTitles, TitleService, TocError, Track, TrackGroup,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// A disc as described in a `disc.toml` file.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub full_width_title: String,
    pub total_frames: u64,
    pub used_frames: u64,
    pub tracks: Vec<TrackConfig>,
    pub groups: Vec<GroupConfig>,
}

mod name_format {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr<Err = String>,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct ConfigFile {
    disc: DiscSection,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tracks: Vec<TrackConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    groups: Vec<GroupConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
struct DiscSection {
    title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    full_width_title: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    total_frames: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    used_frames: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TrackConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_width_title: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub duration_frames: u64,
    #[serde(default, with = "name_format")]
    pub encoding: Encoding,
    #[serde(default, with = "name_format")]
    pub channels: Channels,
    #[serde(default, skip_serializing_if = "is_false")]
    pub protected: bool,
}

/// A named group. `tracks` holds the 1-based first and last track numbers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GroupConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_width_title: String,
    pub tracks: [usize; 2],
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let ConfigFile {
            disc,
            tracks,
            groups,
        } = file;
        Self {
            title: disc.title,
            full_width_title: disc.full_width_title,
            total_frames: disc.total_frames,
            used_frames: disc.used_frames,
            tracks,
            groups,
        }
    }
}

impl Config {
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        let config_file = ConfigFile {
            disc: DiscSection {
                title: self.title.clone(),
                full_width_title: self.full_width_title.clone(),
                total_frames: self.total_frames,
                used_frames: self.used_frames,
            },
            tracks: self.tracks.clone(),
            groups: self.groups.clone(),
        };

        toml::to_string_pretty(&config_file)
    }

    /// Builds the disc model, rejecting group layouts that overlap or run
    /// past the last track. Disc and group titles are escaped so they cannot
    /// break the raw title string.
    pub fn to_disc(&self) -> Result<Disc, Error> {
        let tracks = self
            .tracks
            .iter()
            .enumerate()
            .map(|(index, track)| Track {
                index,
                title: track.title.clone(),
                full_width_title: track.full_width_title.clone(),
                duration_frames: track.duration_frames,
                encoding: track.encoding,
                channels: track.channels,
                protected: track.protected,
            })
            .collect();

        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let [first, last] = group.tracks;
            groups.push(
                TrackGroup::new(
                    escape_title_delimiters(&group.title),
                    track_index(first)?,
                    track_index(last)?,
                )
                .with_full_width_title(escape_full_width_title_delimiters(
                    &group.full_width_title,
                )),
            );
        }

        Ok(Disc::new(escape_title_delimiters(&self.title), tracks, groups)?
            .with_full_width_title(escape_full_width_title_delimiters(&self.full_width_title))
            .with_capacity(self.total_frames, self.used_frames))
    }

    pub fn from_disc(disc: &Disc) -> Self {
        Self {
            title: disc.title.clone(),
            full_width_title: disc.full_width_title.clone(),
            total_frames: disc.total_frames,
            used_frames: disc.used_frames,
            tracks: disc
                .tracks()
                .iter()
                .map(|track| TrackConfig {
                    title: track.title.clone(),
                    full_width_title: track.full_width_title.clone(),
                    duration_frames: track.duration_frames,
                    encoding: track.encoding,
                    channels: track.channels,
                    protected: track.protected,
                })
                .collect(),
            groups: disc
                .groups()
                .iter()
                .map(|group| GroupConfig {
                    title: group.title.clone(),
                    full_width_title: group.full_width_title.clone(),
                    tracks: [group.first + 1, group.last + 1],
                })
                .collect(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config, Error> {
    let str = std::fs::read_to_string(path)?;
    let config_file =
        toml::from_str::<ConfigFile>(&str).map_err(|e| Error::ConfigError(e.to_string()))?;
    Ok(config_file.into())
}

pub fn save_config(path: &Path, config: &Config) -> Result<(), Error> {
    let toml = config
        .to_toml_string()
        .map_err(|e| Error::ConfigError(e.to_string()))?;
    std::fs::write(path, toml)?;
    Ok(())
}

/// 1-based track number to 0-based index.
fn track_index(number: usize) -> Result<usize, Error> {
    number.checked_sub(1).ok_or(Error::TrackNumberError)
}

pub fn compile(disc: &Disc) -> Result<RawTitles, Error> {
    Ok(compile_disc_titles(disc).ok_or(TocError::TitleTableFull)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    pub without_groups: usize,
    pub with_groups: usize,
}

pub fn budget(disc: &Disc) -> Budget {
    Budget {
        without_groups: available_title_chars(disc, false),
        with_groups: available_title_chars(disc, true),
    }
}

/// One line per display group, with 1-based track numbers.
pub fn describe_groups(disc: &Disc) -> Vec<String> {
    decompose_for_display(disc)
        .iter()
        .map(|group| {
            let tracks = group.tracks();
            let range = match (tracks.first(), tracks.last()) {
                (Some(first), Some(last)) if first.index == last.index => {
                    format!("{}", first.index + 1)
                }
                (Some(first), Some(last)) => format!("{}-{}", first.index + 1, last.index + 1),
                _ => String::new(),
            };
            match group {
                Group::Named { title, .. } => format!("{range}: {title}"),
                Group::Ungrouped { .. } => format!("{range}: (ungrouped)"),
            }
        })
        .collect()
}

/// Loads the disc into an in-memory player so edits go through the same
/// path they would on hardware.
fn player(disc: &Disc) -> Result<TitleService<MockDevice>, Error> {
    let raw = compile(disc)?;
    let device = MockDevice::new(disc.tracks().to_vec(), raw);
    Ok(TitleService::new(device))
}

fn finish(service: TitleService<MockDevice>, disc: &Disc) -> Result<Disc, Error> {
    let mut device = service.into_inner()?;
    let edited = device.list_content()?;
    Ok(edited.with_capacity(disc.total_frames, disc.used_frames))
}

pub fn delete_tracks(disc: &Disc, numbers: &[usize]) -> Result<Disc, Error> {
    let indexes = numbers
        .iter()
        .map(|&number| track_index(number))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Deleting track indexes {indexes:?}");

    let service = player(disc)?;
    service.delete_tracks(&indexes)?;
    finish(service, disc)
}

pub fn move_track(disc: &Disc, from: usize, to: usize) -> Result<Disc, Error> {
    let (source, target) = (track_index(from)?, track_index(to)?);

    let service = player(disc)?;
    service.move_track(source, target, true)?;
    finish(service, disc)
}

pub fn group_tracks(disc: &Disc, numbers: &[usize], title: &str) -> Result<Disc, Error> {
    let mut indexes = numbers
        .iter()
        .map(|&number| track_index(number))
        .collect::<Result<Vec<_>, _>>()?;
    indexes.sort_unstable();
    if !is_sequential(&indexes) {
        return Err(TocError::NotSequential.into());
    }
    let first = *indexes.first().ok_or(TocError::EmptySelection)?;

    let service = player(disc)?;
    service.add_group(first, indexes.len(), title)?;
    finish(service, disc)
}

pub fn sanitize(text: &str, full_width: bool) -> String {
    if full_width {
        sanitize_full_width(text)
    } else {
        sanitize_half_width(text)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error("{0}")]
    ConfigError(String),

    #[error("Track numbers start at 1")]
    TrackNumberError,

    #[error(transparent)]
    TocError(#[from] TocError),
}
