/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Name-based field filtering.
//!
//! The container stores *shells*: a job without its work planes, a work
//! plane without its vector blocks. [`CloneExcluding`] produces such
//! shells as deep structural copies with the named top-level fields left
//! at their default, everything else copied in full.

use crate::model::{Job, WorkPlane};

/// Structural copy of a message with named top-level fields left empty.
///
/// Field names follow the protobuf schema. Names that do not match any
/// top-level field of the message are ignored, mirroring a predicate that
/// never fires.
pub trait CloneExcluding: Sized {
    /// Returns a deep copy of `self` in which every field named in
    /// `excluded` is absent, empty, or zero; all other fields compare
    /// equal to the original.
    fn clone_excluding(&self, excluded: &[&str]) -> Self;
}

impl CloneExcluding for Job {
    fn clone_excluding(&self, excluded: &[&str]) -> Self {
        let mut copy = self.clone();
        for name in excluded {
            match *name {
                "num_work_planes" => copy.num_work_planes = 0,
                "work_planes" => copy.work_planes.clear(),
                "job_meta_data" => copy.job_meta_data = None,
                "marking_params_map" => copy.marking_params_map.clear(),
                _ => {}
            }
        }
        copy
    }
}

impl CloneExcluding for WorkPlane {
    fn clone_excluding(&self, excluded: &[&str]) -> Self {
        let mut copy = self.clone();
        for name in excluded {
            match *name {
                "x_pos_in_mm" => copy.x_pos_in_mm = 0.0,
                "y_pos_in_mm" => copy.y_pos_in_mm = 0.0,
                "z_pos_in_mm" => copy.z_pos_in_mm = 0.0,
                "x_rot_in_deg" => copy.x_rot_in_deg = 0.0,
                "y_rot_in_deg" => copy.y_rot_in_deg = 0.0,
                "z_rot_in_deg" => copy.z_rot_in_deg = 0.0,
                "num_blocks" => copy.num_blocks = 0,
                "repeats" => copy.repeats = 0,
                "work_plane_number" => copy.work_plane_number = 0,
                "machine_type" => copy.machine_type = 0,
                "meta_data" => copy.meta_data = None,
                "vector_blocks" => copy.vector_blocks.clear(),
                _ => {}
            }
        }
        copy
    }
}
