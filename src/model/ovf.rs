/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::BTreeMap;

/// Top-level container of a manufacturing job.
///
/// A job is an ordered sequence of work planes plus job-level metadata.
/// When a job is stored in an OVF file, the `work_planes` field is kept out
/// of the serialized *job shell*; the work planes live in their own blocks
/// inside the file and `num_work_planes` records how many were written.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Job {
    /// Number of work planes in the job. Maintained by the writer; equals
    /// the length of the job LUT in any finalized file.
    #[prost(int32, tag = "1")]
    pub num_work_planes: i32,
    /// The work planes, in execution order. Empty in a job shell.
    #[prost(message, repeated, tag = "2")]
    pub work_planes: Vec<WorkPlane>,
    #[prost(message, optional, tag = "3")]
    pub job_meta_data: Option<JobMetaData>,
    /// Marking parameter sets referenced by vector blocks through
    /// [`VectorBlock::marking_params_key`].
    #[prost(btree_map = "int32, message", tag = "4")]
    pub marking_params_map: BTreeMap<i32, MarkingParams>,
}

/// Descriptive metadata of a [`Job`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct JobMetaData {
    #[prost(string, tag = "1")]
    pub job_name: String,
    #[prost(string, tag = "2")]
    pub author: String,
    #[prost(string, tag = "3")]
    pub description: String,
    /// Creation time as seconds since the Unix epoch.
    #[prost(int64, tag = "4")]
    pub job_creation_time: i64,
    /// Version number of the job, incremented on each modification.
    #[prost(uint64, tag = "5")]
    pub version: u64,
    /// Bounding box of all geometry in the job, in the machine coordinate
    /// system.
    #[prost(message, optional, tag = "6")]
    pub bounds: Option<AxisAlignedBox2D>,
}

/// A parameter set controlling how vectors are marked.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MarkingParams {
    #[prost(float, tag = "1")]
    pub laser_power_in_w: f32,
    #[prost(float, tag = "2")]
    pub laser_speed_in_mm_per_s: f32,
    #[prost(float, tag = "3")]
    pub jump_speed_in_mm_s: f32,
    #[prost(float, tag = "4")]
    pub laser_focus_shift_in_mm: f32,
    #[prost(string, tag = "5")]
    pub name: String,
}

/// An axis-aligned rectangle in the work-plane coordinate system.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AxisAlignedBox2D {
    #[prost(float, tag = "1")]
    pub x_min: f32,
    #[prost(float, tag = "2")]
    pub y_min: f32,
    #[prost(float, tag = "3")]
    pub x_max: f32,
    #[prost(float, tag = "4")]
    pub y_max: f32,
}

/// One physical layer (slice) of a [`Job`].
///
/// A work plane positions its geometry in space and carries an ordered
/// sequence of vector blocks. In an OVF file the `vector_blocks` field is
/// kept out of the serialized *work-plane shell*; the blocks are stored as
/// individual length-delimited records so that each one can be read on its
/// own.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkPlane {
    #[prost(float, tag = "1")]
    pub x_pos_in_mm: f32,
    #[prost(float, tag = "2")]
    pub y_pos_in_mm: f32,
    #[prost(float, tag = "3")]
    pub z_pos_in_mm: f32,
    #[prost(float, tag = "4")]
    pub x_rot_in_deg: f32,
    #[prost(float, tag = "5")]
    pub y_rot_in_deg: f32,
    #[prost(float, tag = "6")]
    pub z_rot_in_deg: f32,
    /// Number of vector blocks in this work plane.
    #[prost(int32, tag = "7")]
    pub num_blocks: i32,
    /// How often this work plane is to be repeated by the machine.
    #[prost(int32, tag = "8")]
    pub repeats: i32,
    /// Index of this work plane in the job. Assigned by the writer in
    /// insertion order.
    #[prost(int32, tag = "9")]
    pub work_plane_number: i32,
    #[prost(enumeration = "MachineType", tag = "10")]
    pub machine_type: i32,
    #[prost(message, optional, tag = "11")]
    pub meta_data: Option<WorkPlaneMetaData>,
    /// The vector blocks, in execution order. Empty in a work-plane shell.
    #[prost(message, repeated, tag = "12")]
    pub vector_blocks: Vec<VectorBlock>,
}

/// Statistics and bounds of a [`WorkPlane`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkPlaneMetaData {
    #[prost(double, tag = "1")]
    pub total_scan_distance_in_mm: f64,
    #[prost(double, tag = "2")]
    pub total_jump_distance_in_mm: f64,
    #[prost(message, optional, tag = "3")]
    pub bounds: Option<AxisAlignedBox2D>,
}

/// The class of machine a work plane is targeted at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MachineType {
    Unspecified = 0,
    LaserPowderBedFusion = 1,
    DirectedEnergyDeposition = 2,
    Polymerization = 3,
}

/// A group of tool-path vectors sharing one marking parameter set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VectorBlock {
    /// Key into [`Job::marking_params_map`].
    #[prost(int32, tag = "1")]
    pub marking_params_key: i32,
    #[prost(message, optional, tag = "2")]
    pub meta_data: Option<VectorBlockMetaData>,
    /// The geometry payload.
    #[prost(oneof = "vector_block::VectorData", tags = "3, 4, 5")]
    pub vector_data: Option<vector_block::VectorData>,
}

/// Nested message and enum types in `VectorBlock`.
pub mod vector_block {
    /// Geometry payload of a [`VectorBlock`](super::VectorBlock).
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum VectorData {
        #[prost(message, tag = "3")]
        LineSequence(super::LineSequence),
        #[prost(message, tag = "4")]
        Hatches(super::Hatches),
        #[prost(message, tag = "5")]
        PointSequence(super::PointSequence),
    }
}

/// Structural keys tying a [`VectorBlock`] to the part it builds.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VectorBlockMetaData {
    #[prost(int64, tag = "1")]
    pub part_key: i64,
    #[prost(int64, tag = "2")]
    pub patch_key: i64,
    #[prost(int64, tag = "3")]
    pub contour_index: i64,
}

/// A connected polyline: n points are marked as n − 1 connected lines.
///
/// Coordinates are stored as x/y pairs, so `points.len()` is even.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LineSequence {
    #[prost(float, repeated, packed = "true", tag = "1")]
    pub points: Vec<f32>,
}

/// Independent lines: 2n points are marked as n disconnected lines.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Hatches {
    #[prost(float, repeated, packed = "true", tag = "1")]
    pub points: Vec<f32>,
}

/// Single exposure points, each marked for a fixed duration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PointSequence {
    #[prost(float, repeated, packed = "true", tag = "1")]
    pub points: Vec<f32>,
}
