//! Parallel-iterator shim for the permutation loops.
//!
//! The Moran permutation tests drive their draws through
//! `into_par_iter()`. With the default `parallel` feature that is rayon;
//! without it, the fallback trait below resolves the same call to a plain
//! sequential iterator, so the statistics code
//! compiles either way. Per-draw seeding keeps the two paths bit-identical.

#[cfg(feature = "parallel")]
pub use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
mod fallback {
    /// Single-threaded `into_par_iter()`: forwards to `into_iter()`, after
    /// which the chain is the ordinary `Iterator` API.
    pub trait IntoParallelIterator {
        type Iter;
        type Item;
        fn into_par_iter(self) -> Self::Iter;
    }

    impl<I: IntoIterator> IntoParallelIterator for I {
        type Iter = I::IntoIter;
        type Item = I::Item;
        fn into_par_iter(self) -> Self::Iter {
            self.into_iter()
        }
    }
}

#[cfg(not(feature = "parallel"))]
pub use fallback::*;
