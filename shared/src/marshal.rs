//! Minimal binary marshal/unmarshal traits used by the DCEP wire codec.
//!
//! Mirrors the `shared::marshal` traits the rest of the workspace is built
//! against: `MarshalSize` computes an exact encoded length, `Marshal` encodes
//! into a caller-provided buffer, `Unmarshal` decodes from anything
//! implementing `bytes::Buf`.

use crate::error::Result;
use bytes::{Buf, BytesMut};

pub trait MarshalSize {
    fn marshal_size(&self) -> usize;
}

pub trait Marshal: MarshalSize {
    fn marshal_to(&self, buf: &mut [u8]) -> Result<usize>;

    fn marshal(&self) -> Result<BytesMut> {
        let mut buf = BytesMut::with_capacity(self.marshal_size());
        buf.resize(self.marshal_size(), 0);
        let n = self.marshal_to(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

pub trait Unmarshal {
    fn unmarshal<B>(buf: &mut B) -> Result<Self>
    where
        Self: Sized,
        B: Buf;
}
