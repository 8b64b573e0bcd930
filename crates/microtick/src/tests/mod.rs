
mod timer;

pub(crate) use fake::{eight_bit_profile, FakeCounter, Op};
