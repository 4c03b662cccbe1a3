/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_pub)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod consts;
pub mod error;
pub mod model;
pub mod read;
pub mod utils;
pub mod write;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::consts::*;
    pub use crate::error::{Error, Result};
    pub use crate::model::*;
    pub use crate::read::OvfFileReader;
    pub use crate::utils::*;
    pub use crate::write::OvfFileWriter;
}
