//! In-memory policy store
//!
//! [`MemoryStore`] keeps the whole policy graph in process memory behind a
//! `RwLock`, implementing the [`ngac_core::PolicyStore`] read port plus the
//! write helpers tests and seeding code need. It honours the same keying the
//! port requires of any backend: entities by hash id, associations and
//! prohibitions by `(edge id, policy class)`, outgoing edges by source id.

mod store;

pub use store::MemoryStore;
