/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Constants of the on-disk container layout.

/// Magic bytes at the beginning of Open Vector Format files (`LVF!`).
pub const MAGIC_BYTES: [u8; 4] = [0x4c, 0x56, 0x46, 0x21];

/// Default offset to write while the real LUT offset is unknown.
///
/// A finalized file never carries this value: the placeholder is patched
/// with the real offset when the enclosing structure is complete. Reading
/// it back therefore identifies a partially-written or corrupt file.
pub const DEFAULT_LUT_OFFSET: i64 = 0;

/// Length of the fixed file header: the magic bytes followed by the
/// little-endian job-LUT offset.
pub const HEADER_LEN: u64 = MAGIC_BYTES.len() as u64 + 8;
