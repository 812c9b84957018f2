//! Canonical structural hashing.
//!
//! Produces a SHA256 digest of a value tree that does not depend on
//! container identity:
//!
//! - sequences hash their element digests in order
//! - sets hash their sorted element digests
//! - maps hash the sorted digests of their `(key, value)` pairs
//!
//! Each container kind is domain-separated by a tag byte so that, for example,
//! `[1]` and `{1}` never collide.

use crate::path::{Path, PathSegment};
use crate::value::{Scalar, Value};
use sha2::{Digest as _, Sha256};

/// Raw SHA256 digest.
pub type Digest = [u8; 32];

const TAG_NULL: u8 = 0x00;
const TAG_BOOL: u8 = 0x01;
const TAG_INT: u8 = 0x02;
const TAG_FLOAT: u8 = 0x03;
const TAG_STRING: u8 = 0x04;
const TAG_SEQUENCE: u8 = 0x10;
const TAG_SET: u8 = 0x11;
const TAG_MAP: u8 = 0x12;
const TAG_PAIR: u8 = 0x13;
const TAG_INDEX: u8 = 0x20;
const TAG_KEY: u8 = 0x21;

/// Incremental canonical hasher.
///
/// Every variable-length field is length-prefixed, so concatenations stay
/// unambiguous.
pub struct CanonicalHasher {
    inner: Sha256,
}

impl CanonicalHasher {
    pub fn new() -> Self {
        Self {
            inner: Sha256::new(),
        }
    }

    pub fn tag(&mut self, tag: u8) -> &mut Self {
        self.inner.update([tag]);
        self
    }

    pub fn count(&mut self, len: usize) -> &mut Self {
        self.inner.update((len as u64).to_le_bytes());
        self
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.count(bytes.len());
        self.inner.update(bytes);
        self
    }

    pub fn digest(&mut self, digest: &Digest) -> &mut Self {
        self.inner.update(digest);
        self
    }

    pub fn segment(&mut self, segment: &PathSegment) -> &mut Self {
        match segment {
            PathSegment::Index(i) => {
                self.tag(TAG_INDEX);
                self.inner.update((*i as u64).to_le_bytes());
            }
            PathSegment::Key(k) => {
                self.tag(TAG_KEY).bytes(k.as_bytes());
            }
        }
        self
    }

    pub fn path(&mut self, path: &Path) -> &mut Self {
        self.count(path.len());
        for segment in path.segments() {
            self.segment(segment);
        }
        self
    }

    pub fn value(&mut self, value: &Value) -> &mut Self {
        let digest = canonical_hash(value);
        self.digest(&digest)
    }

    pub fn finish(self) -> Digest {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.inner.finalize());
        out
    }
}

impl Default for CanonicalHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn scalar_hash(scalar: &Scalar) -> Digest {
    let mut h = CanonicalHasher::new();
    match scalar {
        Scalar::Null => {
            h.tag(TAG_NULL);
        }
        Scalar::Bool(b) => {
            h.tag(TAG_BOOL).tag(u8::from(*b));
        }
        Scalar::Int(i) => {
            h.tag(TAG_INT).bytes(&i.to_le_bytes());
        }
        Scalar::Float(f) => {
            // All NaNs share one digest, matching their equality
            let bits = if f.is_nan() {
                f64::NAN.to_bits()
            } else {
                f.to_bits()
            };
            h.tag(TAG_FLOAT).bytes(&bits.to_le_bytes());
        }
        Scalar::String(s) => {
            h.tag(TAG_STRING).bytes(s.as_bytes());
        }
    }
    h.finish()
}

enum Step<'a> {
    Visit(&'a Value),
    Combine(&'a Value),
}

/// Compute the canonical digest of a value tree.
///
/// Walks the tree post-order on an explicit stack, so nesting depth is
/// bounded by heap rather than call stack.
pub fn canonical_hash(value: &Value) -> Digest {
    let mut steps = vec![Step::Visit(value)];
    let mut digests: Vec<Digest> = Vec::new();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(node) => match node {
                Value::Scalar(s) => digests.push(scalar_hash(s)),
                Value::Set(items) => {
                    let mut members: Vec<Digest> = items.iter().map(scalar_hash).collect();
                    members.sort_unstable();
                    digests.push(combine(TAG_SET, &members));
                }
                Value::Sequence(items) => {
                    steps.push(Step::Combine(node));
                    steps.extend(items.iter().rev().map(Step::Visit));
                }
                Value::Map(map) => {
                    steps.push(Step::Combine(node));
                    steps.extend(map.values().rev().map(Step::Visit));
                }
            },
            Step::Combine(node) => match node {
                Value::Sequence(items) => {
                    let children = digests.split_off(digests.len() - items.len());
                    digests.push(combine(TAG_SEQUENCE, &children));
                }
                Value::Map(map) => {
                    let children = digests.split_off(digests.len() - map.len());
                    let mut pairs: Vec<Digest> = map
                        .keys()
                        .zip(&children)
                        .map(|(key, child)| {
                            let mut pair = CanonicalHasher::new();
                            pair.tag(TAG_PAIR).bytes(key.as_bytes()).digest(child);
                            pair.finish()
                        })
                        .collect();
                    pairs.sort_unstable();
                    digests.push(combine(TAG_MAP, &pairs));
                }
                Value::Scalar(_) | Value::Set(_) => {}
            },
        }
    }

    digests.pop().unwrap_or_default()
}

fn combine(tag: u8, children: &[Digest]) -> Digest {
    let mut h = CanonicalHasher::new();
    h.tag(tag).count(children.len());
    for d in children {
        h.digest(d);
    }
    h.finish()
}

/// Hex-encoded canonical digest (64 characters).
pub fn canonical_hash_hex(value: &Value) -> String {
    hex::encode(canonical_hash(value))
}
