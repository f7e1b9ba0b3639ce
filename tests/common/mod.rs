// Not every test binary exercises every helper
#[allow(dead_code)]
pub mod mocks;
