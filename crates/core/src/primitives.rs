//! The primitive contract and the providers that supply stage instances
//!
//! Every stage of the chain is reduced to two operations: stream bytes in,
//! then write a fixed-size digest out and start over. The orchestrator never
//! sees anything else, so primitives with very different internal state are
//! interchangeable behind [`HashPrimitive`].

use alloc::boxed::Box;

use crate::haval::Haval256;
use crate::params::StageId;

/// A streaming hash with a fixed output length.
pub trait HashPrimitive {
    /// Absorb `data`. Repeated calls are equivalent to one call with the
    /// concatenation of all inputs.
    fn ingest(&mut self, data: &[u8]);

    /// Write the digest into the front of `dst` and reset to the initial state.
    ///
    /// # Panics
    ///
    /// If `dst` is shorter than the primitive's output length. Nothing is
    /// written in that case.
    fn finalize(&mut self, dst: &mut [u8]);
}

/// Owned, thread-movable primitive as held by the pipeline
pub type BoxedPrimitive = Box<dyn HashPrimitive + Send>;

/// Supplies primitive instances for pipeline stages.
///
/// A provider may cover only some stages; pipelines are assembled from
/// several providers combined as a pair, where the first one that knows a
/// stage wins.
pub trait PrimitiveProvider {
    /// A fresh instance for `stage`, or `None` if this provider lacks it
    ///
    /// The instance should write `stage.output_len()` bytes on finalize. A
    /// narrower one is accepted, and the pipeline zero-fills the rest of the
    /// stage output.
    fn provide(&self, stage: StageId) -> Option<BoxedPrimitive>;
}

impl<P: PrimitiveProvider + ?Sized> PrimitiveProvider for &P {
    fn provide(&self, stage: StageId) -> Option<BoxedPrimitive> {
        (**self).provide(stage)
    }
}

impl<A: PrimitiveProvider, B: PrimitiveProvider> PrimitiveProvider for (A, B) {
    fn provide(&self, stage: StageId) -> Option<BoxedPrimitive> {
        self.0.provide(stage).or_else(|| self.1.provide(stage))
    }
}

/// Provider backed by a closure
///
/// ```rust
/// use x17_core::{BoxedPrimitive, Haval256, StageId, from_fn};
///
/// let provider = from_fn(|stage| match stage {
///     StageId::Haval256 => Some(Box::new(Haval256::new()) as BoxedPrimitive),
///     _ => None,
/// });
/// # let _ = provider;
/// ```
pub fn from_fn<F>(f: F) -> FnProvider<F>
where
    F: Fn(StageId) -> Option<BoxedPrimitive>,
{
    FnProvider(f)
}

/// See [`from_fn`]
#[derive(Clone, Copy)]
pub struct FnProvider<F>(F);

impl<F> PrimitiveProvider for FnProvider<F>
where
    F: Fn(StageId) -> Option<BoxedPrimitive>,
{
    fn provide(&self, stage: StageId) -> Option<BoxedPrimitive> {
        (self.0)(stage)
    }
}

/// Primitives implemented in this crate (HAVAL-256/5)
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinPrimitives;

impl PrimitiveProvider for BuiltinPrimitives {
    fn provide(&self, stage: StageId) -> Option<BoxedPrimitive> {
        match stage {
            StageId::Haval256 => Some(Box::new(Haval256::new())),
            _ => None,
        }
    }
}

/// Adapter from any RustCrypto fixed-output hasher to [`HashPrimitive`]
#[cfg(feature = "digest")]
#[derive(Clone, Default)]
pub struct DigestStage<D> {
    inner: D,
}

#[cfg(feature = "digest")]
impl<D> DigestStage<D>
where
    D: Default + digest::Update + digest::FixedOutput + Send + 'static,
{
    pub fn new() -> Self {
        Self { inner: D::default() }
    }

    /// Output length of the wrapped hasher in bytes
    pub fn output_len() -> usize {
        <D as digest::OutputSizeUser>::output_size()
    }

    pub fn boxed() -> BoxedPrimitive {
        Box::new(Self::new())
    }
}

#[cfg(feature = "digest")]
impl<D> HashPrimitive for DigestStage<D>
where
    D: Default + digest::Update + digest::FixedOutput,
{
    #[inline]
    fn ingest(&mut self, data: &[u8]) {
        digest::Update::update(&mut self.inner, data);
    }

    fn finalize(&mut self, dst: &mut [u8]) {
        let len = <D as digest::OutputSizeUser>::output_size();
        assert!(
            dst.len() >= len,
            "digest output buffer holds {} bytes, needs {}",
            dst.len(),
            len
        );

        let out = digest::FixedOutput::finalize_fixed(core::mem::take(&mut self.inner));
        dst[..len].copy_from_slice(&out);
    }
}
