/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![allow(dead_code)]

use ovf::prelude::*;

/// A vector block with values derived from its coordinates, so any block
/// read back from a file can be traced to its `(i, j)` position. The
/// geometry payload cycles through the three oneof variants.
pub fn sample_vector_block(i: usize, j: usize) -> VectorBlock {
    let base = (i * 100 + j * 10) as f32;
    let points = vec![base, base + 1.0, base + 2.0, base + 3.0];
    let geometry = match j % 3 {
        0 => vector_block::VectorData::LineSequence(LineSequence { points }),
        1 => vector_block::VectorData::Hatches(Hatches { points }),
        _ => vector_block::VectorData::PointSequence(PointSequence { points }),
    };
    VectorBlock {
        marking_params_key: (j + 1) as i32,
        meta_data: Some(VectorBlockMetaData {
            part_key: i as i64,
            patch_key: j as i64,
            contour_index: (i + j) as i64,
        }),
        vector_data: Some(geometry),
    }
}

/// A work plane at layer `i` with `num_blocks` sample vector blocks.
pub fn sample_work_plane(i: usize, num_blocks: usize) -> WorkPlane {
    WorkPlane {
        x_pos_in_mm: i as f32 * 0.5,
        y_pos_in_mm: i as f32 * 0.25,
        z_pos_in_mm: i as f32 * 0.03,
        num_blocks: num_blocks as i32,
        repeats: 1,
        work_plane_number: i as i32,
        machine_type: MachineType::LaserPowderBedFusion as i32,
        meta_data: Some(WorkPlaneMetaData {
            total_scan_distance_in_mm: i as f64 * 1234.5,
            total_jump_distance_in_mm: i as f64 * 67.8,
            bounds: Some(AxisAlignedBox2D {
                x_min: -10.0,
                y_min: -10.0,
                x_max: 10.0,
                y_max: 10.0,
            }),
        }),
        vector_blocks: (0..num_blocks)
            .map(|j| sample_vector_block(i, j))
            .collect(),
        ..Default::default()
    }
}

/// A job with `num_work_planes` work planes of `blocks_per_plane` vector
/// blocks each, plus job-level metadata and two marking parameter sets.
pub fn sample_job(num_work_planes: usize, blocks_per_plane: usize) -> Job {
    Job {
        num_work_planes: num_work_planes as i32,
        work_planes: (0..num_work_planes)
            .map(|i| sample_work_plane(i, blocks_per_plane))
            .collect(),
        job_meta_data: Some(JobMetaData {
            job_name: "sample job".into(),
            author: "integration tests".into(),
            description: "synthetic fixture".into(),
            job_creation_time: 1_700_000_000,
            version: 2,
            bounds: Some(AxisAlignedBox2D {
                x_min: -50.0,
                y_min: -50.0,
                x_max: 50.0,
                y_max: 50.0,
            }),
        }),
        marking_params_map: [
            (
                1,
                MarkingParams {
                    laser_power_in_w: 180.0,
                    laser_speed_in_mm_per_s: 800.0,
                    jump_speed_in_mm_s: 5000.0,
                    laser_focus_shift_in_mm: 0.0,
                    name: "bulk".into(),
                },
            ),
            (
                2,
                MarkingParams {
                    laser_power_in_w: 120.0,
                    laser_speed_in_mm_per_s: 400.0,
                    jump_speed_in_mm_s: 5000.0,
                    laser_focus_shift_in_mm: 0.2,
                    name: "contour".into(),
                },
            ),
        ]
        .into(),
    }
}

/// What the reader is expected to hand back for `job` after a round trip:
/// `num_work_planes` equals the actual count and each work plane's
/// `work_plane_number` is its insertion index.
pub fn expected_job(job: &Job) -> Job {
    let mut expected = job.clone();
    expected.num_work_planes = expected.work_planes.len() as i32;
    for (i, wp) in expected.work_planes.iter_mut().enumerate() {
        wp.work_plane_number = i as i32;
    }
    expected
}

/// Reads the whole job back through random access: the job shell returned
/// by `open_file` plus every full work plane.
pub fn read_back_job(reader: &OvfFileReader, job_shell: &Job) -> ovf::Result<Job> {
    let mut job = job_shell.clone();
    for i in 0..job.num_work_planes as usize {
        job.work_planes.push(reader.work_plane(i)?);
    }
    Ok(job)
}
