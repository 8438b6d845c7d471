// Defaults and caps applied when ingesting graph descriptors

// Box extent used when a descriptor omits width/height
pub const DEFAULT_EXTENT: f64 = 1_000_000.0;

// Scene size caps
pub const MAX_NODES: usize = 200_000;
pub const MAX_EDGES: usize = 300_000;
pub const MAX_BENDS_TOTAL: usize = 2_000_000;

// Integers above this are no longer exact in f64
pub const MAX_EXACT_INT: f64 = 9_007_199_254_740_991.0;

#[inline]
pub fn is_integral(v: f64) -> bool { v.is_finite() && v.fract() == 0.0 }
