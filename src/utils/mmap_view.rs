/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Read-only memory mapping with page-aligned views.
//!
//! [`Mapping`] owns an open file; [`Mapping::view`] hands out cheap
//! read-only [`FileView`]s over arbitrary byte ranges of it. The OS
//! requires map offsets to be multiples of the allocation granularity, so
//! a view maps from the nearest granularity boundary below the requested
//! offset and exposes only the tail starting at the offset itself.

use crate::error::{Error, Result};
use mmap_rs::{Mmap, MmapFlags, MmapOptions};
use std::fs::File;
use std::path::Path;

/// A read-only file whose contents can be mapped into memory in windows.
#[derive(Debug)]
pub struct Mapping {
    file: File,
    file_size: u64,
}

impl Mapping {
    /// Opens `path` for mapping.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let file_size = file.metadata()?.len();
        Ok(Self { file, file_size })
    }

    /// Returns the size of the full file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Creates a view covering at least `[offset, offset + min_size)`.
    ///
    /// When `min_size` is 0, the view extends to the end of the file. The
    /// first byte of [`FileView::data`] is the byte at `offset`, and
    /// [`FileView::size`] is at least `min_size`.
    pub fn view(&self, offset: u64, min_size: usize) -> Result<FileView> {
        if offset >= self.file_size {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "view offset {offset} past the end of a {} byte file",
                    self.file_size
                ),
            )));
        }
        let end = if min_size == 0 {
            self.file_size
        } else {
            offset + min_size as u64
        };
        if end > self.file_size {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "view [{offset}, {end}) does not fit in a {} byte file",
                    self.file_size
                ),
            )));
        }

        let granularity = MmapOptions::allocation_granularity() as u64;
        let aligned = offset - offset % granularity;
        let delta = (offset - aligned) as usize;

        let mmap = unsafe {
            MmapOptions::new((end - aligned) as usize)?
                .with_flags(MmapFlags::empty())
                .with_file(&self.file, aligned)
                .map()?
        };

        Ok(FileView { mmap, delta })
    }
}

/// A read-only window over a mapped file region.
///
/// A view holds its own mapping of the underlying file, so it stays valid
/// after the [`Mapping`] that created it is dropped. Dropping the view
/// releases its OS resources.
pub struct FileView {
    mmap: Mmap,
    /// Distance from the page-aligned map base to the requested offset.
    delta: usize,
}

impl core::fmt::Debug for FileView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FileView")
            .field("mmap", &self.mmap.as_ptr())
            .field("delta", &self.delta)
            .finish()
    }
}

impl FileView {
    /// The mapped bytes, starting exactly at the requested offset.
    pub fn data(&self) -> &[u8] {
        &self.mmap.as_ref()[self.delta..]
    }

    /// The number of readable bytes, at least the requested minimum size.
    pub fn size(&self) -> usize {
        self.mmap.len() - self.delta
    }
}

impl AsRef<[u8]> for FileView {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}
