mod insight;
mod memory;

pub use insight::InsightService;
pub use memory::MemoryService;
