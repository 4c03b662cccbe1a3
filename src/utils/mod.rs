/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Support code shared by the reader and the writer: length-delimited
//! message framing, name-based field filtering, and memory-mapped file
//! views.

mod delimited;
mod field_filter;
mod mmap_view;

pub use delimited::*;
pub use field_filter::*;
pub use mmap_view::*;
