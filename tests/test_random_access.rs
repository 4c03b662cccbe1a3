/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Random-access queries: consistency between whole-work-plane and
//! single-record reads, and index bounds under every cache tier.

mod common;

use anyhow::Result;
use common::*;
use ovf::prelude::*;
use std::path::PathBuf;

fn written_sample(dir: &tempfile::TempDir) -> Result<(PathBuf, Job)> {
    let path = dir.path().join("sample.ovf");
    let job = sample_job(3, 4);
    OvfFileWriter::new().write_full_job(&job, &path)?;
    Ok((path, expected_job(&job)))
}

#[test]
fn test_vector_block_matches_work_plane() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (path, _) = written_sample(&dir)?;

    let reader = OvfFileReader::new();
    reader.open_file(&path)?;

    for i in 0..3 {
        let wp = reader.work_plane(i)?;
        assert_eq!(wp.vector_blocks.len(), 4);
        for j in 0..4 {
            assert_eq!(reader.vector_block(i, j)?, wp.vector_blocks[j]);
        }
    }
    Ok(())
}

#[test]
fn test_shell_matches_work_plane_without_blocks() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (path, _) = written_sample(&dir)?;

    let reader = OvfFileReader::new();
    reader.open_file(&path)?;

    for i in 0..3 {
        let mut full = reader.work_plane(i)?;
        full.vector_blocks.clear();
        assert_eq!(full, reader.work_plane_shell(i)?);
    }
    Ok(())
}

#[test]
fn test_single_block_without_touching_other_planes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (path, job) = written_sample(&dir)?;

    let reader = OvfFileReader::new();
    reader.open_file(&path)?;

    assert_eq!(
        reader.vector_block(1, 2)?,
        job.work_planes[1].vector_blocks[2]
    );
    Ok(())
}

#[test]
fn test_queries_fail_before_open_and_after_close() -> Result<()> {
    let reader = OvfFileReader::new();
    assert!(!reader.is_file_open());
    assert!(matches!(reader.work_plane(0), Err(Error::NotOpen)));
    assert!(matches!(reader.work_plane_shell(0), Err(Error::NotOpen)));
    assert!(matches!(reader.vector_block(0, 0), Err(Error::NotOpen)));
    assert!(matches!(reader.cache_full_job(), Err(Error::NotOpen)));
    assert!(matches!(
        reader.cache_work_plane_shells(),
        Err(Error::NotOpen)
    ));
    assert!(matches!(reader.clear_cache(), Err(Error::NotOpen)));

    let dir = tempfile::tempdir()?;
    let (path, _) = written_sample(&dir)?;
    reader.open_file(&path)?;
    reader.work_plane(0)?;
    reader.close_file();

    assert!(matches!(reader.work_plane(0), Err(Error::NotOpen)));
    Ok(())
}

#[test]
fn test_index_bounds_under_every_cache_tier() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (path, _) = written_sample(&dir)?;

    let reader = OvfFileReader::new();
    reader.open_file(&path)?;

    let check = |reader: &OvfFileReader| {
        assert!(matches!(
            reader.work_plane(3),
            Err(Error::InvalidIndex { index: 3, len: 3 })
        ));
        assert!(matches!(
            reader.work_plane_shell(17),
            Err(Error::InvalidIndex { index: 17, len: 3 })
        ));
        assert!(matches!(
            reader.vector_block(3, 0),
            Err(Error::InvalidIndex { index: 3, len: 3 })
        ));
        assert!(matches!(
            reader.vector_block(0, 4),
            Err(Error::InvalidIndex { index: 4, len: 4 })
        ));
        // In-range queries still work.
        assert!(reader.work_plane(2).is_ok());
        assert!(reader.vector_block(2, 3).is_ok());
    };

    check(&reader);
    reader.cache_work_plane_shells()?;
    check(&reader);
    reader.cache_full_job()?;
    check(&reader);
    reader.clear_cache()?;
    check(&reader);
    Ok(())
}
