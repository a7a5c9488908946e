#[cfg(not(feature = "memory"))]
compile_error!("Enable a repo feature: `memory`.");

pub mod context;
pub mod events;
#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub type Repo = memory::InMemoryRepo;

/// Backing store for every checkout port except the request context.
#[cfg(feature = "memory")]
pub fn build_repo() -> Repo {
    memory::InMemoryRepo::new()
}
