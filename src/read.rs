/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Random-access OVF file reader.
//!
//! [`OvfFileReader`] memory-maps an OVF file and parses its lookup tables
//! once, on open. After that, any work plane, work-plane shell, or single
//! vector block can be answered by mapping just the byte range it lives in;
//! nothing else of the file is touched. Jobs are routinely larger than
//! memory, which is the point of this access pattern.
//!
//! # Caching
//!
//! Queries can optionally be served from an in-memory cache with three
//! tiers: no cache, work-plane shells only, or the full job including all
//! vector blocks. [`cache_work_plane_shells`](OvfFileReader::cache_work_plane_shells)
//! and [`cache_full_job`](OvfFileReader::cache_full_job) move between the
//! tiers in either direction; query results are identical under every
//! tier. Files larger than the auto-cache threshold (64 MiB by default)
//! are cached in full on open.
//!
//! # Concurrency
//!
//! The reader state sits behind a reader/writer lock: queries run
//! concurrently under a shared lock, while [`open_file`](OvfFileReader::open_file),
//! [`close_file`](OvfFileReader::close_file) and the cache mutators take
//! the lock exclusively. Each query maps its own short-lived view, so no
//! mapped memory is shared across threads.

use crate::consts::{DEFAULT_LUT_OFFSET, HEADER_LEN, MAGIC_BYTES};
use crate::error::{Error, Result};
use crate::model::{Job, JobLut, VectorBlock, WorkPlane, WorkPlaneLut};
use crate::utils::{decode_delimited, CloneExcluding, FileView, Mapping};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, info};
use parking_lot::RwLock;
use std::path::Path;

/// Files larger than this are cached in full on open (64 MiB).
pub const DEFAULT_AUTO_CACHE_THRESHOLD: u64 = 64 * 1024 * 1024;

/// Random-access reader over a memory-mapped OVF file.
///
/// All methods take `&self`; the reader can be shared across threads and
/// queried concurrently.
pub struct OvfFileReader {
    auto_cache_threshold: u64,
    inner: RwLock<Inner>,
}

/// Everything guarded by the reader lock.
#[derive(Default)]
struct Inner {
    /// The open file and its parsed lookup tables; `None` when closed.
    open: Option<OpenFile>,
    /// Cached job: work-plane shells at least, vector blocks too when
    /// `vector_blocks_cached` is set.
    cache: Option<Job>,
    vector_blocks_cached: bool,
}

/// The mapping and the tables parsed once on open.
struct OpenFile {
    mapping: Mapping,
    job_shell: Job,
    job_lut: JobLut,
    wp_luts: Vec<WorkPlaneLut>,
}

impl Default for OvfFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl OvfFileReader {
    /// Creates a reader with the default auto-cache threshold.
    pub fn new() -> Self {
        Self::with_auto_cache_threshold(DEFAULT_AUTO_CACHE_THRESHOLD)
    }

    /// Creates a reader that caches the full job on open for files larger
    /// than `auto_cache_threshold` bytes.
    pub fn with_auto_cache_threshold(auto_cache_threshold: u64) -> Self {
        Self {
            auto_cache_threshold,
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Opens the OVF file at `path` and returns its job shell.
    ///
    /// Any previously open file is closed first. Fails with
    /// [`Error::NotOvf`] on a magic-byte mismatch, [`Error::Corrupt`] on a
    /// damaged container, and [`Error::Io`] on OS-level failures.
    pub fn open_file(&self, path: impl AsRef<Path>) -> Result<Job> {
        let path = path.as_ref();
        let (job, file_size) = {
            let mut inner = self.inner.write();
            inner.open = None;
            inner.cache = None;
            inner.vector_blocks_cached = false;

            let open = OpenFile::open(path)?;
            let job = open.job_shell.clone();
            let file_size = open.mapping.file_size();
            inner.open = Some(open);
            (job, file_size)
        };
        debug!(
            "opened {}: {} work planes, {file_size} bytes",
            path.display(),
            job.num_work_planes
        );

        if file_size > self.auto_cache_threshold {
            info!(
                "{} exceeds the auto-cache threshold, caching the full job",
                path.display()
            );
            self.cache_full_job()?;
        }
        Ok(job)
    }

    /// Closes the open file and drops all caches. Idempotent.
    pub fn close_file(&self) {
        let mut inner = self.inner.write();
        inner.open = None;
        inner.cache = None;
        inner.vector_blocks_cached = false;
    }

    /// Returns whether a file is currently open.
    pub fn is_file_open(&self) -> bool {
        self.inner.read().open.is_some()
    }

    /// Returns work plane `i` with all its vector blocks.
    pub fn work_plane(&self, i: usize) -> Result<WorkPlane> {
        self.inner.read().work_plane_impl(i, true, true)
    }

    /// Returns work plane `i` with `vector_blocks` empty.
    pub fn work_plane_shell(&self, i: usize) -> Result<WorkPlane> {
        self.inner.read().work_plane_impl(i, false, true)
    }

    /// Returns vector block `j` of work plane `i`.
    pub fn vector_block(&self, i: usize, j: usize) -> Result<VectorBlock> {
        self.inner.read().vector_block_impl(i, j, true)
    }

    /// Ensures the shells-only cache tier.
    ///
    /// Downgrades a full cache by dropping the per-work-plane vector
    /// blocks; builds the shell cache from the file when there is none.
    pub fn cache_work_plane_shells(&self) -> Result<()> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let of = inner.open.as_ref().ok_or(Error::NotOpen)?;
        match inner.cache.as_mut() {
            Some(cache) if inner.vector_blocks_cached => {
                for wp in &mut cache.work_planes {
                    wp.vector_blocks.clear();
                }
            }
            Some(_) => {}
            None => {
                let mut cache = of.job_shell.clone();
                cache.work_planes.reserve(of.num_work_planes());
                for i in 0..of.num_work_planes() {
                    cache.work_planes.push(of.read_work_plane(i, false)?);
                }
                inner.cache = Some(cache);
            }
        }
        inner.vector_blocks_cached = false;
        debug!("work-plane shells cached");
        Ok(())
    }

    /// Ensures the full cache tier.
    ///
    /// Upgrades a shells-only cache by loading just the vector blocks;
    /// builds the cache from scratch when there is none.
    pub fn cache_full_job(&self) -> Result<()> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let of = inner.open.as_ref().ok_or(Error::NotOpen)?;
        match inner.cache.as_mut() {
            Some(cache) if !inner.vector_blocks_cached => {
                for (i, wp) in cache.work_planes.iter_mut().enumerate() {
                    let (view, wp_start) = of.work_plane_view(i)?;
                    of.read_vector_blocks_into(i, wp, &view, wp_start)?;
                }
            }
            Some(_) => {}
            None => {
                let mut cache = of.job_shell.clone();
                cache.work_planes.reserve(of.num_work_planes());
                for i in 0..of.num_work_planes() {
                    cache.work_planes.push(of.read_work_plane(i, true)?);
                }
                inner.cache = Some(cache);
            }
        }
        inner.vector_blocks_cached = true;
        debug!("full job cached");
        Ok(())
    }

    /// Drops the cache entirely.
    pub fn clear_cache(&self) -> Result<()> {
        let mut inner = self.inner.write();
        if inner.open.is_none() {
            return Err(Error::NotOpen);
        }
        inner.cache = None;
        inner.vector_blocks_cached = false;
        Ok(())
    }

    /// Returns whether at least the work-plane shells are cached.
    pub fn is_work_plane_shells_cached(&self) -> bool {
        self.inner.read().cache.is_some()
    }

    /// Returns whether the full job, vector blocks included, is cached.
    pub fn is_full_job_cached(&self) -> bool {
        let inner = self.inner.read();
        inner.cache.is_some() && inner.vector_blocks_cached
    }
}

impl Inner {
    fn open_file(&self) -> Result<&OpenFile> {
        self.open.as_ref().ok_or(Error::NotOpen)
    }

    /// Answers a work-plane query, consulting the cache tiers when
    /// `try_cache` is set.
    ///
    /// With a shells-only cache and vector blocks requested, the shell
    /// comes from the cache and only the blocks are parsed from the file.
    fn work_plane_impl(
        &self,
        i: usize,
        include_vector_blocks: bool,
        try_cache: bool,
    ) -> Result<WorkPlane> {
        let of = self.open_file()?;
        let n = of.num_work_planes();
        if i >= n {
            return Err(Error::InvalidIndex { index: i, len: n });
        }

        if try_cache {
            if let Some(cache) = &self.cache {
                if include_vector_blocks && self.vector_blocks_cached {
                    return Ok(cache.work_planes[i].clone());
                }
                if !include_vector_blocks {
                    return Ok(cache.work_planes[i].clone_excluding(&["vector_blocks"]));
                }
            }
        }

        // At least the vector blocks must come from the file.
        let (view, wp_start) = of.work_plane_view(i)?;
        let mut wp = match &self.cache {
            Some(cache) if try_cache => cache.work_planes[i].clone(),
            _ => of.read_work_plane_shell(i, &view, wp_start)?,
        };
        if include_vector_blocks {
            of.read_vector_blocks_into(i, &mut wp, &view, wp_start)?;
        }
        Ok(wp)
    }

    /// Answers a single-vector-block query, consulting the full cache when
    /// `try_cache` is set.
    fn vector_block_impl(&self, i: usize, j: usize, try_cache: bool) -> Result<VectorBlock> {
        let of = self.open_file()?;
        let n = of.num_work_planes();
        if i >= n {
            return Err(Error::InvalidIndex { index: i, len: n });
        }

        if try_cache && self.vector_blocks_cached {
            if let Some(cache) = &self.cache {
                let blocks = &cache.work_planes[i].vector_blocks;
                return blocks.get(j).cloned().ok_or(Error::InvalidIndex {
                    index: j,
                    len: blocks.len(),
                });
            }
        }
        of.read_vector_block(i, j)
    }
}

impl OpenFile {
    /// Opens and validates `path`: magic bytes, job LUT, every work-plane
    /// LUT, and the job shell.
    fn open(path: &Path) -> Result<Self> {
        let mapping = Mapping::open(path)?;
        let file_size = mapping.file_size();
        if file_size < HEADER_LEN {
            return Err(Error::corrupt(format!(
                "{}: {file_size} bytes is too small to hold an OVF header",
                path.display()
            )));
        }

        let job_lut_pos_raw = {
            let header = mapping.view(0, HEADER_LEN as usize)?;
            let data = header.data();
            if data[..MAGIC_BYTES.len()] != MAGIC_BYTES {
                return Err(Error::NotOvf {
                    path: path.to_path_buf(),
                });
            }
            LittleEndian::read_i64(&data[MAGIC_BYTES.len()..HEADER_LEN as usize])
        };
        if job_lut_pos_raw < 0 || job_lut_pos_raw == DEFAULT_LUT_OFFSET {
            return Err(Error::corrupt(format!(
                "{}: job LUT offset is {job_lut_pos_raw}; the file was never finalized",
                path.display()
            )));
        }
        let job_lut_pos = job_lut_pos_raw as u64;
        if job_lut_pos < HEADER_LEN || job_lut_pos >= file_size {
            return Err(Error::corrupt(format!(
                "{}: job LUT offset {job_lut_pos} points outside the file",
                path.display()
            )));
        }

        let job_lut: JobLut = {
            let view = mapping.view(job_lut_pos, 0)?;
            decode_delimited(view.data())?.0
        };
        let job_shell_pos = job_lut.job_shell_position;
        if job_shell_pos < HEADER_LEN as i64 || job_shell_pos as u64 >= file_size {
            return Err(Error::corrupt(format!(
                "{}: job shell offset {job_shell_pos} points outside the file",
                path.display()
            )));
        }

        let n = job_lut.work_plane_positions.len();
        let mut wp_luts = Vec::with_capacity(n);
        for i in 0..n {
            let (lower, upper) = work_plane_bounds(&job_lut, file_size, i)?;
            let view = mapping.view(lower, (upper - lower) as usize)?;
            let data = view.data();

            let wp_lut_pos = LittleEndian::read_i64(&data[..8]);
            if wp_lut_pos < (lower + 8) as i64 || wp_lut_pos as u64 >= upper {
                return Err(Error::corrupt(format!(
                    "work plane {i}: LUT offset {wp_lut_pos} outside its block [{lower}, {upper})"
                )));
            }
            let local = (wp_lut_pos as u64 - lower) as usize;
            wp_luts.push(decode_delimited::<WorkPlaneLut>(&data[local..])?.0);
        }

        let job_shell: Job = {
            let view = mapping.view(job_shell_pos as u64, 0)?;
            decode_delimited(view.data())?.0
        };

        Ok(Self {
            mapping,
            job_shell,
            job_lut,
            wp_luts,
        })
    }

    fn num_work_planes(&self) -> usize {
        self.job_lut.work_plane_positions.len()
    }

    /// Maps the byte range of work plane `i`, returning the view and the
    /// absolute start offset of the block.
    fn work_plane_view(&self, i: usize) -> Result<(FileView, u64)> {
        let (lower, upper) = work_plane_bounds(&self.job_lut, self.mapping.file_size(), i)?;
        Ok((self.mapping.view(lower, (upper - lower) as usize)?, lower))
    }

    /// Parses work plane `i` from the file, bypassing any cache.
    fn read_work_plane(&self, i: usize, include_vector_blocks: bool) -> Result<WorkPlane> {
        let (view, wp_start) = self.work_plane_view(i)?;
        let mut wp = self.read_work_plane_shell(i, &view, wp_start)?;
        if include_vector_blocks {
            self.read_vector_blocks_into(i, &mut wp, &view, wp_start)?;
        }
        Ok(wp)
    }

    /// Parses the shell of work plane `i` out of its mapped block.
    fn read_work_plane_shell(&self, i: usize, view: &FileView, wp_start: u64) -> Result<WorkPlane> {
        let local = local_offset(
            self.wp_luts[i].work_plane_shell_position,
            wp_start,
            view.size(),
            "work plane shell",
        )?;
        Ok(decode_delimited(&view.data()[local..])?.0)
    }

    /// Parses every vector block of work plane `i` out of its mapped block
    /// and appends them to `wp`.
    fn read_vector_blocks_into(
        &self,
        i: usize,
        wp: &mut WorkPlane,
        view: &FileView,
        wp_start: u64,
    ) -> Result<()> {
        for &pos in &self.wp_luts[i].vector_block_positions {
            let local = local_offset(pos, wp_start, view.size(), "vector block")?;
            wp.vector_blocks.push(decode_delimited(&view.data()[local..])?.0);
        }
        Ok(())
    }

    /// Parses vector block `j` of work plane `i` from the file, bypassing
    /// any cache.
    fn read_vector_block(&self, i: usize, j: usize) -> Result<VectorBlock> {
        let (view, wp_start) = self.work_plane_view(i)?;
        let positions = &self.wp_luts[i].vector_block_positions;
        let pos = *positions.get(j).ok_or(Error::InvalidIndex {
            index: j,
            len: positions.len(),
        })?;
        let local = local_offset(pos, wp_start, view.size(), "vector block")?;
        Ok(decode_delimited(&view.data()[local..])?.0)
    }
}

/// Returns the absolute byte range `[lower, upper)` of work plane `i`: its
/// recorded start up to the next work plane, or up to the job shell for
/// the last one.
fn work_plane_bounds(job_lut: &JobLut, file_size: u64, i: usize) -> Result<(u64, u64)> {
    let n = job_lut.work_plane_positions.len();
    if i >= n {
        return Err(Error::InvalidIndex { index: i, len: n });
    }
    let lower = job_lut.work_plane_positions[i];
    let upper = if i + 1 < n {
        job_lut.work_plane_positions[i + 1]
    } else {
        job_lut.job_shell_position
    };
    if lower < HEADER_LEN as i64 || upper <= lower + 8 || upper as u64 > file_size {
        return Err(Error::corrupt(format!(
            "work plane {i}: invalid byte range [{lower}, {upper})"
        )));
    }
    Ok((lower as u64, upper as u64))
}

/// Converts an absolute LUT offset into an offset local to a mapped
/// work-plane block, verifying it lies inside the block's payload.
fn local_offset(pos: i64, wp_start: u64, view_size: usize, what: &str) -> Result<usize> {
    if pos >= 0 {
        if let Some(local) = (pos as u64).checked_sub(wp_start) {
            let local = local as usize;
            if local >= 8 && local < view_size {
                return Ok(local);
            }
        }
    }
    Err(Error::corrupt(format!(
        "{what} offset {pos} lies outside its work plane block"
    )))
}
