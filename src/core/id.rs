/*!
 * ID Generation System
 * Type-safe identifier wrappers with deterministic, collision-free generation
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// Type-Safe ID Wrappers
// ============================================================================

/// Memory block identifier, stable for the block's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u64);

/// Process identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessId(pub u64);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block-{}", self.0)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process-{}", self.0)
    }
}

impl std::str::FromStr for ProcessId {
    type Err = std::num::ParseIntError;

    /// Accepts both `process-7` and bare `7`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("process-").unwrap_or(s);
        raw.parse().map(ProcessId)
    }
}

impl From<u64> for BlockId {
    fn from(raw: u64) -> Self {
        BlockId(raw)
    }
}

impl From<BlockId> for u64 {
    fn from(id: BlockId) -> Self {
        id.0
    }
}

impl From<u64> for ProcessId {
    fn from(raw: u64) -> Self {
        ProcessId(raw)
    }
}

impl From<ProcessId> for u64 {
    fn from(id: ProcessId) -> Self {
        id.0
    }
}

// ============================================================================
// ID Generator Trait
// ============================================================================

/// Generic ID generator interface
pub trait IdGenerator<T> {
    /// Generate next ID
    fn next(&self) -> T;

    /// Make sure `id` and everything below it is never handed out
    fn advance_past(&self, id: T);
}

// ============================================================================
// Atomic Counter Generator
// ============================================================================

/// Monotonic counter shared between clones
///
/// Replaces timestamp-based ids so that runs are reproducible: a fresh
/// generator always yields the same sequence.
pub struct AtomicGenerator<T> {
    counter: Arc<AtomicU64>,
    _marker: PhantomData<T>,
}

impl<T> AtomicGenerator<T> {
    /// Create new generator starting at given value
    #[inline]
    pub fn new(start: u64) -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(start)),
            _marker: PhantomData,
        }
    }

    /// Create new generator starting at 1
    #[inline]
    pub fn default_start() -> Self {
        Self::new(1)
    }
}

impl<T> Default for AtomicGenerator<T> {
    fn default() -> Self {
        Self::default_start()
    }
}

impl<T> Clone for AtomicGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for AtomicGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicGenerator")
            .field("next", &self.counter.load(Ordering::Relaxed))
            .finish()
    }
}

impl<T> IdGenerator<T> for AtomicGenerator<T>
where
    T: From<u64> + Into<u64>,
{
    #[inline]
    fn next(&self) -> T {
        T::from(self.counter.fetch_add(1, Ordering::SeqCst))
    }

    #[inline]
    fn advance_past(&self, id: T) {
        let floor = id.into().saturating_add(1);
        self.counter.fetch_max(floor, Ordering::SeqCst);
    }
}
