pub trait Signal<T> {
    fn sample(&mut self, i: u64) -> T;
}

/// Sum of two `u32` signals with wraparound.
#[derive(Debug, Clone, Copy)]
pub struct Mix<A, B> {
    a: A,
    b: B,
}

impl<A: Signal<u32>, B: Signal<u32>> Signal<u32> for Mix<A, B> {
    fn sample(&mut self, i: u64) -> u32 {
        self.a.sample(i).wrapping_add(self.b.sample(i))
    }
}

pub fn mix<A: Signal<u32>, B: Signal<u32>>(a: A, b: B) -> Mix<A, B> {
    Mix { a, b }
}

pub struct Const<T> {
    value: T,
}

impl<T> Const<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Copy> Signal<T> for Const<T> {
    fn sample(&mut self, _: u64) -> T {
        self.value
    }
}

impl<T, F: FnMut(u64) -> T> Signal<T> for F {
    fn sample(&mut self, i: u64) -> T {
        self(i)
    }
}
