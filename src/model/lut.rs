/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/// Lookup table locating the top-level records of an OVF file.
///
/// All positions are absolute byte offsets from the beginning of the file.
/// The table itself is the last record in the file and is located through
/// the patched offset in the file header.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct JobLut {
    /// Offset of the length-delimited job shell.
    #[prost(int64, tag = "1")]
    pub job_shell_position: i64,
    /// Offset of the start of each work-plane block, in work-plane order.
    #[prost(int64, repeated, packed = "true", tag = "2")]
    pub work_plane_positions: Vec<i64>,
}

/// Lookup table locating the records inside one work-plane block.
///
/// All positions are absolute byte offsets from the beginning of the file.
/// The table is the last record of its block and is located through the
/// patched offset in the block's first eight bytes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WorkPlaneLut {
    /// Offset of the length-delimited work-plane shell.
    #[prost(int64, tag = "1")]
    pub work_plane_shell_position: i64,
    /// Offset of each length-delimited vector block, in block order.
    #[prost(int64, repeated, packed = "true", tag = "2")]
    pub vector_block_positions: Vec<i64>,
}
