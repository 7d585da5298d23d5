use std::sync::{Mutex, MutexGuard};

use log::info;

use crate::budget::{UploadTitleBudget, UploadTitles};
use crate::device::DeviceInterface;
use crate::error::{TocError, TocResult};
use crate::groups::{recompute_groups_after_track_move, TrackTarget};
use crate::model::{Disc, TrackGroup};
use crate::sanitize::{
    escape_full_width_title_delimiters, escape_title_delimiters, sanitize_full_width,
    sanitize_half_width,
};
use crate::toc::compile_disc_titles;

/// Runs title edits against a device, one at a time.
///
/// Every method holds the device lock for its whole duration, so a listing
/// and the writes derived from it cannot interleave with another edit.
/// Validation happens before the first write.
pub struct TitleService<D> {
    device: Mutex<D>,
}

impl<D: DeviceInterface> TitleService<D> {
    pub fn new(device: D) -> Self {
        Self {
            device: Mutex::new(device),
        }
    }

    pub fn into_inner(self) -> TocResult<D> {
        self.device
            .into_inner()
            .map_err(|_| TocError::DeviceLockPoisoned)
    }

    fn lock(&self) -> TocResult<MutexGuard<'_, D>> {
        self.device.lock().map_err(|_| TocError::DeviceLockPoisoned)
    }

    pub fn list_content(&self) -> TocResult<Disc> {
        self.lock()?.list_content()
    }

    pub fn rename_track(
        &self,
        index: usize,
        title: &str,
        full_width_title: Option<&str>,
    ) -> TocResult<()> {
        let mut device = self.lock()?;
        device.list_content()?.track(index)?;

        info!("Renaming track {index} to {title:?}");
        device.set_track_title(index, &sanitize_half_width(title), false)?;
        if let Some(full_width_title) = full_width_title {
            device.set_track_title(index, &sanitize_full_width(full_width_title), true)?;
        }
        Ok(())
    }

    pub fn rename_disc(&self, title: &str, full_width_title: Option<&str>) -> TocResult<()> {
        let mut device = self.lock()?;
        let title = escape_title_delimiters(&sanitize_half_width(title));
        let full_width_title = full_width_title
            .map(|title| escape_full_width_title_delimiters(&sanitize_full_width(title)));

        info!("Renaming disc to {title:?}");
        let disc = device.list_content()?;
        write_titles(&mut *device, &disc.with_title(&title, full_width_title.as_deref()))
    }

    /// `first` is the 0-based index of the group's first track.
    pub fn rename_group(
        &self,
        first: usize,
        title: &str,
        full_width_title: Option<&str>,
    ) -> TocResult<()> {
        let mut device = self.lock()?;
        let title = group_title(title);
        let full_width_title = full_width_title.map(full_width_group_title);

        let disc = device
            .list_content()?
            .with_group_renamed(first, &title, full_width_title.as_deref())?;
        info!("Renaming group at track {first} to {title:?}");
        write_titles(&mut *device, &disc)
    }

    /// Groups `length` tracks starting at `first`.
    pub fn add_group(&self, first: usize, length: usize, title: &str) -> TocResult<()> {
        let mut device = self.lock()?;
        let title = group_title(title);
        let indexes: Vec<usize> = (first..first + length).collect();

        let disc = device.list_content()?.with_group(&indexes, &title, "")?;
        info!("Grouping {length} tracks from track {first} as {title:?}");
        write_titles(&mut *device, &disc)
    }

    pub fn delete_group(&self, first: usize) -> TocResult<()> {
        let mut device = self.lock()?;
        let disc = device.list_content()?.without_group(first)?;
        info!("Deleting group at track {first}");
        write_titles(&mut *device, &disc)
    }

    /// Replaces the whole group table.
    pub fn rewrite_groups(&self, groups: Vec<TrackGroup>) -> TocResult<()> {
        let mut device = self.lock()?;
        let disc = device.list_content()?.with_groups(groups)?;
        info!("Rewriting {} groups", disc.groups().len());
        write_titles(&mut *device, &disc)
    }

    /// Erases the tracks, highest index first, then writes the shifted
    /// group table.
    pub fn delete_tracks(&self, indexes: &[usize]) -> TocResult<()> {
        let mut device = self.lock()?;
        let mut disc = device.list_content()?;

        let mut indexes = indexes.to_vec();
        indexes.sort_unstable_by(|a, b| b.cmp(a));
        indexes.dedup();
        for &index in &indexes {
            disc.track(index)?;
        }

        for index in indexes {
            disc = recompute_groups_after_track_move(&disc, index, TrackTarget::Deleted)?
                .into_owned();
            info!("Erasing track {index}");
            device.erase_track(index)?;
        }
        write_titles(&mut *device, &disc)
    }

    pub fn move_track(&self, source: usize, target: usize, update_groups: bool) -> TocResult<()> {
        let mut device = self.lock()?;
        let disc = device.list_content()?;
        let moved = recompute_groups_after_track_move(&disc, source, TrackTarget::Position(target))?;

        info!("Moving track {source} to {target}");
        device.move_track(source, target)?;
        if update_groups {
            write_titles(&mut *device, &moved)?;
        }
        Ok(())
    }

    /// Clears the disc title and the whole group table.
    pub fn wipe_disc_title_info(&self) -> TocResult<()> {
        let mut device = self.lock()?;
        info!("Wiping disc title and groups");
        device.set_disc_title("", false)?;
        device.set_disc_title("", true)
    }

    /// Titles for a batch of new tracks, shortened to what still fits.
    pub fn plan_upload_titles(
        &self,
        titles: &[&str],
        full_width: bool,
    ) -> TocResult<Vec<UploadTitles>> {
        let disc = self.lock()?.list_content()?;
        let mut budget = UploadTitleBudget::new(&disc, full_width);
        Ok(titles
            .iter()
            .map(|title| {
                let allocated = budget.allocate(title, title);
                UploadTitles {
                    title: sanitize_half_width(&allocated.title),
                    full_width_title: if full_width {
                        sanitize_full_width(&allocated.full_width_title)
                    } else {
                        String::new()
                    },
                }
            })
            .collect())
    }
}

fn group_title(title: &str) -> String {
    escape_title_delimiters(&sanitize_half_width(title))
}

fn full_width_group_title(title: &str) -> String {
    escape_full_width_title_delimiters(&sanitize_full_width(title))
}

fn write_titles<D: DeviceInterface + ?Sized>(device: &mut D, disc: &Disc) -> TocResult<()> {
    let raw = compile_disc_titles(disc).ok_or(TocError::TitleTableFull)?;
    device.set_disc_title(&raw.half_width, false)?;
    device.set_disc_title(&raw.full_width, true)
}
