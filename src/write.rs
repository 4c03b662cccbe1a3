/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Incremental OVF file writer.
//!
//! [`OvfFileWriter`] produces an OVF file strictly in writing order:
//! header, one block per work plane, then the job shell and the job LUT.
//! Offsets that cannot be known up front (the job-LUT offset in the
//! header, the work-plane-LUT offset at the start of each block) are
//! written as placeholders and patched once the real position is known,
//! which is what makes streaming writes possible.
//!
//! Two protocols drive the writer:
//!
//! - [`write_full_job`](OvfFileWriter::write_full_job) writes a complete
//!   in-memory job in one call;
//! - [`start_write_partial`](OvfFileWriter::start_write_partial) followed
//!   by [`append_work_plane`](OvfFileWriter::append_work_plane) /
//!   [`append_vector_block`](OvfFileWriter::append_vector_block) and a
//!   final [`finish_write`](OvfFileWriter::finish_write) streams a job
//!   that never exists in memory as a whole.
//!
//! The two produce byte-identical files for the same job. A file is valid
//! only after `finish_write` (or `write_full_job`) returns: aborting
//! earlier leaves a partial file whose header still carries the
//! placeholder LUT offset.

use crate::consts::{DEFAULT_LUT_OFFSET, MAGIC_BYTES};
use crate::error::{Error, Result};
use crate::model::{Job, JobLut, VectorBlock, WorkPlane, WorkPlaneLut};
use crate::utils::{write_delimited, CloneExcluding};
use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// Which write protocol, if any, currently owns the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteState {
    Idle,
    Partial,
    Complete,
}

/// Streaming writer producing OVF files one work plane at a time.
///
/// The writer is single-owner: it is not clonable, and its methods take
/// `&mut self`, so the type system already rules out concurrent use of one
/// writer instance.
#[derive(Debug)]
pub struct OvfFileWriter {
    state: WriteState,
    /// Output stream; present only while a write operation is active.
    out: Option<BufWriter<File>>,
    /// One-element lookahead buffer holding the most recently appended
    /// work plane, so vector blocks can still be merged into it before it
    /// is committed to the stream.
    current_wp: Option<WorkPlane>,
    /// The job shell written into the footer. `num_work_planes` counts the
    /// work planes committed so far.
    job_shell: Option<Job>,
    job_lut: Option<JobLut>,
    /// Absolute position of the 8 placeholder bytes in the header, patched
    /// with the job-LUT offset on finalization.
    job_lut_offset_offset: Option<u64>,
}

impl Default for OvfFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OvfFileWriter {
    /// Creates an idle writer.
    pub fn new() -> Self {
        Self {
            state: WriteState::Idle,
            out: None,
            current_wp: None,
            job_shell: None,
            job_lut: None,
            job_lut_offset_offset: None,
        }
    }

    /// Writes `job` to a new file at `path` in one call.
    ///
    /// `job.work_planes` is written in order; the `num_work_planes`
    /// counter is recomputed while writing and each work plane's
    /// `work_plane_number` is reassigned to its insertion index.
    pub fn write_full_job(&mut self, job: &Job, path: impl AsRef<Path>) -> Result<()> {
        if self.state != WriteState::Idle {
            return Err(Error::invalid_state(
                "cannot start a new write with a write operation in progress",
            ));
        }
        self.out = Some(BufWriter::new(File::create(path.as_ref())?));
        self.state = WriteState::Complete;

        self.write_header(job)?;
        for wp in &job.work_planes {
            self.write_full_work_plane(wp)?;
        }
        self.write_footer()?;

        self.out = None;
        self.state = WriteState::Idle;
        info!(
            "wrote {} work planes to {}",
            job.work_planes.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Starts an incremental write to a new file at `path`.
    ///
    /// Any work planes present in `job_shell` are ignored; append them
    /// one by one with [`append_work_plane`](Self::append_work_plane).
    pub fn start_write_partial(&mut self, job_shell: &Job, path: impl AsRef<Path>) -> Result<()> {
        if self.state != WriteState::Idle {
            return Err(Error::invalid_state(
                "cannot start a new write with a write operation in progress",
            ));
        }
        self.out = Some(BufWriter::new(File::create(path.as_ref())?));
        self.state = WriteState::Partial;

        self.write_header(job_shell)?;
        self.current_wp = None;
        debug!("started partial write to {}", path.as_ref().display());
        Ok(())
    }

    /// Appends `wp` as the next work plane.
    ///
    /// The work plane is buffered, not yet committed: subsequent
    /// [`append_vector_block`](Self::append_vector_block) calls extend it.
    /// The previously buffered work plane, if any, is committed to the
    /// stream first.
    pub fn append_work_plane(&mut self, wp: &WorkPlane) -> Result<()> {
        if self.state != WriteState::Partial {
            return Err(Error::invalid_state(
                "cannot append a work plane without a partial write operation in progress",
            ));
        }
        if let Some(prev) = self.current_wp.take() {
            self.write_full_work_plane(&prev)?;
        }
        self.current_wp = Some(wp.clone());
        Ok(())
    }

    /// Appends `vb` to the work plane currently being built.
    pub fn append_vector_block(&mut self, vb: &VectorBlock) -> Result<()> {
        if self.state != WriteState::Partial {
            return Err(Error::invalid_state(
                "cannot append a vector block without a partial write operation in progress",
            ));
        }
        let wp = self.current_wp.as_mut().ok_or(Error::NoCurrentWorkPlane)?;
        wp.vector_blocks.push(vb.clone());
        Ok(())
    }

    /// Commits the buffered work plane, writes the footer, and closes the
    /// file. Mandatory: without it the file is not a valid OVF file.
    pub fn finish_write(&mut self) -> Result<()> {
        if self.state != WriteState::Partial {
            return Err(Error::invalid_state(
                "cannot finish a partial write without a partial write operation in progress",
            ));
        }
        self.write_footer()?;
        self.out = None;
        self.state = WriteState::Idle;
        Ok(())
    }

    /// Borrows the in-memory job shell of the active write operation.
    pub fn job_shell(&self) -> Result<&Job> {
        self.job_shell
            .as_ref()
            .ok_or_else(|| Error::invalid_state("no write operation in progress"))
    }

    /// Mutably borrows the in-memory job shell of the active write
    /// operation. Changes are reflected in the serialized shell when the
    /// file is finalized.
    pub fn job_shell_mut(&mut self) -> Result<&mut Job> {
        self.job_shell
            .as_mut()
            .ok_or_else(|| Error::invalid_state("no write operation in progress"))
    }

    /// Writes the magic bytes and the job-LUT offset placeholder, and sets
    /// up the in-memory job shell and job LUT.
    fn write_header(&mut self, job: &Job) -> Result<()> {
        let mut shell = job.clone_excluding(&["work_planes"]);
        shell.num_work_planes = 0;

        let out = stream(&mut self.out)?;
        out.write_all(&MAGIC_BYTES)?;
        let placeholder_pos = out.stream_position()?;
        out.write_i64::<LittleEndian>(DEFAULT_LUT_OFFSET)?;

        self.job_lut_offset_offset = Some(placeholder_pos);
        self.job_shell = Some(shell);
        self.job_lut = Some(JobLut::default());
        Ok(())
    }

    /// Writes one complete work-plane block: placeholder offset, vector
    /// blocks, shell, block LUT, then patches the placeholder with the LUT
    /// position.
    fn write_full_work_plane(&mut self, wp: &WorkPlane) -> Result<()> {
        let out = stream(&mut self.out)?;
        let job_shell = self
            .job_shell
            .as_mut()
            .ok_or_else(|| Error::invalid_state("no write operation in progress"))?;
        let job_lut = self
            .job_lut
            .as_mut()
            .ok_or_else(|| Error::invalid_state("no write operation in progress"))?;

        out.seek(SeekFrom::End(0))?;
        let wp_start = out.stream_position()?;
        job_lut.work_plane_positions.push(wp_start as i64);
        out.write_i64::<LittleEndian>(DEFAULT_LUT_OFFSET)?;

        let mut wp_lut = WorkPlaneLut::default();
        for vb in &wp.vector_blocks {
            wp_lut
                .vector_block_positions
                .push(out.stream_position()? as i64);
            write_delimited(vb, out)?;
        }

        let mut shell = wp.clone_excluding(&["vector_blocks"]);
        shell.work_plane_number = job_shell.num_work_planes;

        wp_lut.work_plane_shell_position = out.stream_position()? as i64;
        write_delimited(&shell, out)?;

        let wp_lut_offset = out.stream_position()?;
        write_delimited(&wp_lut, out)?;

        out.seek(SeekFrom::Start(wp_start))?;
        out.write_i64::<LittleEndian>(wp_lut_offset as i64)?;
        out.seek(SeekFrom::End(0))?;

        job_shell.num_work_planes += 1;
        Ok(())
    }

    /// Commits the buffered work plane if any, writes the job shell and
    /// the job LUT, and patches the header with the LUT position.
    fn write_footer(&mut self) -> Result<()> {
        if let Some(wp) = self.current_wp.take() {
            self.write_full_work_plane(&wp)?;
        }

        let job_shell = self
            .job_shell
            .take()
            .ok_or_else(|| Error::invalid_state("no write operation in progress"))?;
        let mut job_lut = self
            .job_lut
            .take()
            .ok_or_else(|| Error::invalid_state("no write operation in progress"))?;
        let placeholder_pos = self
            .job_lut_offset_offset
            .take()
            .ok_or_else(|| Error::invalid_state("no write operation in progress"))?;

        let out = stream(&mut self.out)?;
        out.seek(SeekFrom::End(0))?;
        job_lut.job_shell_position = out.stream_position()? as i64;
        write_delimited(&job_shell, out)?;

        let job_lut_pos = out.stream_position()?;
        out.seek(SeekFrom::Start(placeholder_pos))?;
        out.write_i64::<LittleEndian>(job_lut_pos as i64)?;

        out.seek(SeekFrom::End(0))?;
        write_delimited(&job_lut, out)?;
        out.flush()?;
        debug!(
            "finalized OVF file: {} work planes, job LUT at {job_lut_pos}",
            job_lut.work_plane_positions.len()
        );
        Ok(())
    }
}

/// Accessor for the output stream of an active write operation.
fn stream(out: &mut Option<BufWriter<File>>) -> Result<&mut BufWriter<File>> {
    out.as_mut()
        .ok_or_else(|| Error::invalid_state("the output stream is not set"))
}
