//! Data model for hash-linked blocks and the block hasher.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Hash carried by the genesis block of every chain.
pub const GENESIS_HASH: &str = "20202020";
/// Previous-hash sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "";
/// Payload of the genesis block.
pub const GENESIS_DATA: &str = "genesisBlock";

/// An immutable, hash-linked record.
///
/// Fields are private: a `Block` is built once and only read afterwards.
/// Its JSON form uses `index`, `hash`, `previousHash`, `data`, `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    index: u64,
    hash: String,
    previous_hash: String,
    data: String,
    /// Unix seconds.
    timestamp: i64,
}

impl Block {
    /// Build a block from explicit fields. Nothing is checked here; use the
    /// validator before trusting the result.
    pub fn new(
        index: u64,
        hash: impl Into<String>,
        previous_hash: impl Into<String>,
        data: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            index,
            hash: hash.into(),
            previous_hash: previous_hash.into(),
            data: data.into(),
            timestamp,
        }
    }

    /// The fixed first block. Only the timestamp varies between instances.
    pub fn genesis(timestamp: i64) -> Self {
        Self::new(
            0,
            GENESIS_HASH,
            GENESIS_PREVIOUS_HASH,
            GENESIS_DATA,
            timestamp,
        )
    }

    /// Build the successor of `predecessor` carrying `data`, with its hash
    /// computed from the new fields.
    pub fn successor(predecessor: &Block, data: impl Into<String>, timestamp: i64) -> Self {
        let data = data.into();
        let index = predecessor.index.wrapping_add(1);
        let hash = compute_hash(index, &predecessor.hash, timestamp, &data);
        Self::new(index, hash, predecessor.hash.clone(), data, timestamp)
    }

    /// Parse untyped input into a block if it is structurally valid.
    ///
    /// Requires an object with `index` (u64), `hash`, `previousHash`, `data`
    /// (strings) and `timestamp` (i64). Extra keys are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            index: obj.get("index")?.as_u64()?,
            hash: obj.get("hash")?.as_str()?.to_owned(),
            previous_hash: obj.get("previousHash")?.as_str()?.to_owned(),
            data: obj.get("data")?.as_str()?.to_owned(),
            timestamp: obj.get("timestamp")?.as_i64()?,
        })
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// True when the fixed genesis fields match. The timestamp is ignored.
    pub fn is_genesis(&self) -> bool {
        self.index == 0
            && self.hash == GENESIS_HASH
            && self.previous_hash == GENESIS_PREVIOUS_HASH
            && self.data == GENESIS_DATA
    }

    /// Recompute this block's hash from its own fields.
    pub fn recompute_hash(&self) -> String {
        compute_hash(self.index, &self.previous_hash, self.timestamp, &self.data)
    }
}

/// Structural validity of untrusted input: every field present with the
/// right primitive kind. Total over any JSON value.
pub fn validate_structure(value: &Value) -> bool {
    Block::from_value(value).is_some()
}

/// Hash inputs (concatenate as bytes, SHA-256) and return lowercase hex.
pub fn hash_concat(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for p in parts {
        hasher.update(p);
    }
    hex::encode(hasher.finalize())
}

/// Compute a block hash from its fields.
///
/// Concatenates, without separators, the decimal `index`, `previous_hash`,
/// the decimal `timestamp` and `data`. The order is fixed; other
/// implementations must reproduce it byte for byte.
pub fn compute_hash(index: u64, previous_hash: &str, timestamp: i64, data: &str) -> String {
    hash_concat(&[
        index.to_string().as_bytes(),
        previous_hash.as_bytes(),
        timestamp.to_string().as_bytes(),
        data.as_bytes(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_matches_known_vector() {
        assert_eq!(
            compute_hash(1, GENESIS_HASH, 1_700_000_000, "first"),
            "c8a5a9141860d465d5cc8d5c66135ddf319ce2074e9c5c07cd7070ce2a2097e6"
        );
        assert_eq!(
            compute_hash(0, "", -5, "x"),
            "4cb507d36c0bbea8c58d03f6f109b1885cb98227490534a1e6a2a71dbf722377"
        );
    }

    #[test]
    fn hash_is_deterministic() {
        let a = compute_hash(42, "abc", 1_234, "payload");
        let b = compute_hash(42, "abc", 1_234, "payload");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn hash_depends_on_every_field() {
        let base = compute_hash(1, "p", 10, "d");
        assert_ne!(base, compute_hash(2, "p", 10, "d"));
        assert_ne!(base, compute_hash(1, "q", 10, "d"));
        assert_ne!(base, compute_hash(1, "p", 11, "d"));
        assert_ne!(base, compute_hash(1, "p", 10, "e"));
    }

    #[test]
    fn hash_concat_of_nothing_is_empty_digest() {
        assert_eq!(
            hash_concat(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn genesis_has_fixed_fields() {
        let g = Block::genesis(99);
        assert_eq!(g.index(), 0);
        assert_eq!(g.hash(), "20202020");
        assert_eq!(g.previous_hash(), "");
        assert_eq!(g.data(), "genesisBlock");
        assert_eq!(g.timestamp(), 99);
        assert!(g.is_genesis());
        assert!(Block::genesis(1).is_genesis());
        assert!(!Block::new(0, GENESIS_HASH, "", "other", 99).is_genesis());
    }

    #[test]
    fn successor_links_to_predecessor() {
        let g = Block::genesis(0);
        let b = Block::successor(&g, "first", 5);
        assert_eq!(b.index(), 1);
        assert_eq!(b.previous_hash(), GENESIS_HASH);
        assert_eq!(b.hash(), compute_hash(1, GENESIS_HASH, 5, "first"));
        assert_eq!(b.hash(), b.recompute_hash());
    }

    #[test]
    fn json_uses_camel_case_field_names() {
        let b = Block::new(3, "h", "p", "d", 7);
        let v = serde_json::to_value(&b).unwrap();
        assert_eq!(
            v,
            json!({"index": 3, "hash": "h", "previousHash": "p", "data": "d", "timestamp": 7})
        );
        assert_eq!(Block::from_value(&v), Some(b));
    }

    #[test]
    fn structure_accepts_well_formed_input() {
        let v = json!({
            "index": 1, "hash": "h", "previousHash": "", "data": "", "timestamp": -3,
            "extra": [1, 2, 3]
        });
        assert!(validate_structure(&v));
    }

    #[test]
    fn structure_rejects_missing_or_mistyped_fields() {
        let good = json!({
            "index": 1, "hash": "h", "previousHash": "p", "data": "d", "timestamp": 2
        });
        for key in ["index", "hash", "previousHash", "data", "timestamp"] {
            let mut missing = good.clone();
            missing.as_object_mut().unwrap().remove(key);
            assert!(!validate_structure(&missing), "missing {key}");

            let mut nulled = good.clone();
            nulled[key] = Value::Null;
            assert!(!validate_structure(&nulled), "null {key}");
        }

        let mut v = good.clone();
        v["index"] = json!("1");
        assert!(!validate_structure(&v));
        v = good.clone();
        v["index"] = json!(-1);
        assert!(!validate_structure(&v));
        v = good.clone();
        v["index"] = json!(1.5);
        assert!(!validate_structure(&v));
        v = good.clone();
        v["timestamp"] = json!(2.0);
        assert!(!validate_structure(&v));
        v = good.clone();
        v["hash"] = json!(12);
        assert!(!validate_structure(&v));
        v = good;
        v["data"] = json!({"nested": true});
        assert!(!validate_structure(&v));
    }

    #[test]
    fn structure_rejects_non_objects() {
        assert!(!validate_structure(&Value::Null));
        assert!(!validate_structure(&json!([1, 2])));
        assert!(!validate_structure(&json!("block")));
        assert!(!validate_structure(&json!(0)));
    }
}
