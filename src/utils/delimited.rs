/*
 * SPDX-FileCopyrightText: 2025 Digital-Production-Aachen
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Length-delimited message framing.
//!
//! Every message record in an OVF file is *length-delimited*: a varint
//! byte-length prefix followed by that many bytes of protobuf payload. The
//! records are self-describing in length, so a record can be parsed out of
//! a larger byte range (such as a mapped work-plane block) without knowing
//! where it ends.

use crate::error::Result;
use prost::Message;
use std::io::Write;

/// Encodes `msg` with a varint length prefix.
pub fn encode_delimited<M: Message>(msg: &M) -> Vec<u8> {
    msg.encode_length_delimited_to_vec()
}

/// Writes `msg` length-delimited to `w`, returning the number of bytes
/// written.
pub fn write_delimited<M: Message>(msg: &M, w: &mut impl Write) -> Result<u64> {
    let buf = msg.encode_length_delimited_to_vec();
    w.write_all(&buf)?;
    Ok(buf.len() as u64)
}

/// Parses one length-delimited message from the front of `buf`.
///
/// Trailing bytes after the record are ignored. Returns the message and the
/// number of bytes consumed (length prefix included).
pub fn decode_delimited<M: Message + Default>(buf: &[u8]) -> Result<(M, usize)> {
    let len = prost::decode_length_delimiter(buf)?;
    let consumed = prost::length_delimiter_len(len) + len;
    let msg = M::decode_length_delimited(buf)?;
    Ok((msg, consumed))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{JobMetaData, WorkPlane};

    #[test]
    fn test_roundtrip() -> Result<()> {
        let meta = JobMetaData {
            job_name: "roundtrip".into(),
            author: "me".into(),
            version: 3,
            ..Default::default()
        };
        let buf = encode_delimited(&meta);
        let (back, consumed) = decode_delimited::<JobMetaData>(&buf)?;
        assert_eq!(back, meta);
        assert_eq!(consumed, buf.len());
        Ok(())
    }

    #[test]
    fn test_ignores_trailing_bytes() -> Result<()> {
        let wp = WorkPlane {
            z_pos_in_mm: 0.03,
            work_plane_number: 7,
            ..Default::default()
        };
        let mut buf = encode_delimited(&wp);
        let record_len = buf.len();
        buf.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let (back, consumed) = decode_delimited::<WorkPlane>(&buf)?;
        assert_eq!(back, wp);
        assert_eq!(consumed, record_len);
        Ok(())
    }

    #[test]
    fn test_consecutive_records() -> Result<()> {
        let first = JobMetaData {
            job_name: "first".into(),
            ..Default::default()
        };
        let second = JobMetaData {
            job_name: "second".into(),
            ..Default::default()
        };
        let mut buf = encode_delimited(&first);
        buf.extend_from_slice(&encode_delimited(&second));

        let (a, consumed) = decode_delimited::<JobMetaData>(&buf)?;
        let (b, _) = decode_delimited::<JobMetaData>(&buf[consumed..])?;
        assert_eq!(a, first);
        assert_eq!(b, second);
        Ok(())
    }

    #[test]
    fn test_truncated_record_fails() {
        let meta = JobMetaData {
            description: "will be cut short".into(),
            ..Default::default()
        };
        let buf = encode_delimited(&meta);
        assert!(decode_delimited::<JobMetaData>(&buf[..buf.len() - 1]).is_err());
    }
}
