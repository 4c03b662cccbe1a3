/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Hand-maintained [`prost`] bindings for the Open Vector Format messages.
//!
//! The schema of the domain messages ([`Job`], [`WorkPlane`],
//! [`VectorBlock`] and their nested types) is owned by the Open Vector
//! Format protobuf definitions; the structs here mirror it field-for-field
//! and must be kept in sync with it. The lookup-table messages ([`JobLut`],
//! [`WorkPlaneLut`]) are private to the container layout and carry absolute
//! byte offsets into the file.
//!
//! All messages derive [`Clone`] and [`PartialEq`], which are the
//! structural clone and structural equivalence used by the reader, the
//! writer, and the tests.

mod lut;
mod ovf;

pub use lut::*;
pub use ovf::*;
