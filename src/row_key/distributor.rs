// One-byte hash-prefix key distribution. Consecutive keys of one agent land in different
// buckets so writes do not hotspot a single partition; reads fan out over every bucket.

use bytes::{BufMut, Bytes, BytesMut};

use super::ScanBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashPrefixDistributor {
    buckets: u8,
}

impl HashPrefixDistributor {
    /// `buckets` is clamped to at least 1.
    pub fn new(buckets: u8) -> Self {
        Self {
            buckets: buckets.max(1),
        }
    }

    pub fn buckets(&self) -> u8 {
        self.buckets
    }

    /// Bucket for an original key: byte sum modulo bucket count.
    pub fn bucket_of(&self, original_key: &[u8]) -> u8 {
        let sum = original_key
            .iter()
            .fold(0u32, |acc, b| acc.wrapping_add(u32::from(*b)));
        (sum % u32::from(self.buckets)) as u8
    }

    /// Key as stored: bucket prefix followed by the original key.
    pub fn distributed_key(&self, original_key: &[u8]) -> Bytes {
        let mut key = BytesMut::with_capacity(original_key.len() + 1);
        key.put_u8(self.bucket_of(original_key));
        key.put_slice(original_key);
        key.freeze()
    }

    /// Strips the bucket prefix.
    pub fn original_key<'a>(&self, distributed_key: &'a [u8]) -> &'a [u8] {
        distributed_key.get(1..).unwrap_or(&[])
    }

    /// One physical range per bucket, in bucket order.
    pub fn distributed_bounds(&self, bounds: &ScanBounds) -> Vec<ScanBounds> {
        (0..self.buckets)
            .map(|bucket| ScanBounds {
                start: prefixed(bucket, &bounds.start),
                stop: prefixed(bucket, &bounds.stop),
            })
            .collect()
    }
}

fn prefixed(bucket: u8, key: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(key.len() + 1);
    out.put_u8(bucket);
    out.put_slice(key);
    out.freeze()
}
