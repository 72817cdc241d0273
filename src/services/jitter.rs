use ring::rand::{SecureRandom, SystemRandom};

/// Lower bound of the fragmentation factor (inclusive).
pub const JITTER_MIN: f64 = 1.1;

/// Width of the random fragmentation factor range.
pub const JITTER_SPAN: f64 = 0.3;

/// Upper bound of the fragmentation factor. Random draws stay below it; an
/// injected `FixedJitter` may sit on it.
pub const JITTER_MAX: f64 = 1.4;

/// Factor used when the random source cannot produce bytes.
const JITTER_MIDPOINT: f64 = JITTER_MIN + JITTER_SPAN / 2.0;

/// Supplies the allocator-fragmentation multiplier applied to every estimate.
pub trait JitterSource: Send + Sync {
    /// Returns a factor in `[JITTER_MIN, JITTER_MAX]`.
    fn factor(&self) -> f64;
}

/// Draws a fresh factor from the system random generator on every call.
pub struct RingJitter {
    rng: SystemRandom,
}

impl RingJitter {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for RingJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl JitterSource for RingJitter {
    fn factor(&self) -> f64 {
        let mut bytes = [0u8; 4];
        if self.rng.fill(&mut bytes).is_err() {
            tracing::warn!("system random source failed, using midpoint fragmentation factor");
            return JITTER_MIDPOINT;
        }
        factor_from_unit(unit_from_bytes(bytes))
    }
}

/// Always returns the same factor, clamped to `[JITTER_MIN, JITTER_MAX]`.
#[derive(Debug, Clone, Copy)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn factor(&self) -> f64 {
        self.0.clamp(JITTER_MIN, JITTER_MAX)
    }
}

/// Maps 32 random bits onto `[0, 1)`.
fn unit_from_bytes(bytes: [u8; 4]) -> f64 {
    u32::from_le_bytes(bytes) as f64 / (u32::MAX as f64 + 1.0)
}

fn factor_from_unit(unit: f64) -> f64 {
    JITTER_MIN + unit * JITTER_SPAN
}
