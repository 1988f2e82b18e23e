pub mod slab;
pub mod spatial;
