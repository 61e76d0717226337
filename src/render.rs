use crate::signal::Signal;
use std::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderedSample {
    pub index: u64,
    pub value: u32,
}

/// The samples of one session, computed one at a time on demand.
///
/// A render yields exactly `sample_count` samples for indices `0..sample_count` and then stays
/// exhausted. There is no way to rewind it.
pub struct Render<S> {
    signal: S,
    next_index: u64,
    sample_count: u64,
}

impl<S: Signal<u32>> Render<S> {
    pub fn new(signal: S, sample_count: u64) -> Self {
        Self {
            signal,
            next_index: 0,
            sample_count,
        }
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn remaining(&self) -> u64 {
        self.sample_count - self.next_index
    }

    pub fn is_done(&self) -> bool {
        self.next_index >= self.sample_count
    }
}

impl<S: Signal<u32>> Iterator for Render<S> {
    type Item = RenderedSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done() {
            return None;
        }
        let index = self.next_index;
        self.next_index += 1;
        Some(RenderedSample {
            index,
            value: self.signal.sample(index),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining()).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl<S: Signal<u32>> ExactSizeIterator for Render<S> {}

impl<S: Signal<u32>> FusedIterator for Render<S> {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::signal::Const;

    #[test]
    fn yields_exactly_sample_count() {
        let render = Render::new(Const::new(3_u32), 5);
        assert_eq!(render.len(), 5);
        let samples = render.collect::<Vec<_>>();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples.first().map(|s| s.index), Some(0));
        assert_eq!(samples.last().map(|s| s.index), Some(4));
    }

    #[test]
    fn stays_exhausted() {
        let mut render = Render::new(|i: u64| i as u32, 2);
        assert_eq!(render.next().map(|s| s.value), Some(0));
        assert_eq!(render.next().map(|s| s.value), Some(1));
        assert!(render.is_done());
        assert_eq!(render.next(), None);
        assert_eq!(render.next(), None);
        assert_eq!(render.remaining(), 0);
    }

    #[test]
    fn computes_lazily() {
        let mut calls = 0;
        {
            let mut render = Render::new(
                |i: u64| {
                    calls += 1;
                    i as u32
                },
                1_000_000,
            );
            render.next();
            render.next();
        }
        assert_eq!(calls, 2);
    }
}
