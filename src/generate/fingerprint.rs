use crate::generate::resolver::{Resolution, ResolvedReference};
use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Per-node analysis outcome of one factory node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryDecision {
    /// Assigned name.
    pub name: String,
    /// Runtime type name.
    pub type_name: String,
    /// Discovery rank in the canonical graph.
    pub position: u32,
    /// Has a field.
    pub requires_storage: bool,
    /// The field is read-only.
    pub requires_readonly_storage: bool,
    /// Constructed at its use site.
    pub inlined: bool,
    /// Number of pre-canonicalization nodes the factory stands for.
    pub group_size: u32,
}

/// Every decision made for one variant, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantDecisions {
    /// Generated class name.
    pub class_name: String,
    /// Minimum API version.
    pub api_version: u32,
    /// Factories in emission order.
    pub factories: Vec<FactoryDecision>,
    /// Call resolutions in emission order.
    pub resolutions: Vec<ResolvedReference>,
}

/// Stable digest of a run's decisions. Equal inputs and options always give equal fingerprints,
/// whether variants were processed in parallel or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DecisionFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl std::fmt::Display for DecisionFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint of every variant's decisions, in variant order.
pub fn fingerprint_decisions(variants: &[VariantDecisions]) -> DecisionFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(variants.len() as u32);
    for v in variants {
        write_variant(&mut h, v);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> DecisionFingerprint {
        let v = self.inner.digest128();
        DecisionFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_variant(h: &mut StableHasher, v: &VariantDecisions) {
    h.write_str(&v.class_name);
    h.write_u32(v.api_version);

    h.write_u32(v.factories.len() as u32);
    for f in &v.factories {
        h.write_str(&f.name);
        h.write_str(&f.type_name);
        h.write_u32(f.position);
        h.write_bool(f.requires_storage);
        h.write_bool(f.requires_readonly_storage);
        h.write_bool(f.inlined);
        h.write_u32(f.group_size);
    }

    h.write_u32(v.resolutions.len() as u32);
    for r in &v.resolutions {
        h.write_u32(r.caller);
        h.write_u32(r.callee);
        write_resolution(h, r.resolution);
    }
}

fn write_resolution(h: &mut StableHasher, r: Resolution) {
    h.write_u8(match r {
        Resolution::Construct => 0,
        Resolution::ReadField => 1,
        Resolution::Inline => 2,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/generate/fingerprint.rs"]
mod tests;
