mod memories;

pub use memories::MemoryRepository;
