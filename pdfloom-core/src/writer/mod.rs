//! PDF file output

mod allocator;
mod assembler;
mod sink;

pub use allocator::{ObjectAllocator, Offset};
pub use assembler::{DocumentAssembler, Phase};
pub use sink::ByteSink;
