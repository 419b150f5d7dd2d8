use crate::material::FaceMaterials;
use crate::resolver::Resolver;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

/// Per-run memoization of resolved face materials.
///
/// The resolver runs at most once per distinct block name. Distinct keys
/// never contend; concurrent callers for the same not-yet-resolved key are
/// single-flight — one executes the resolver while the rest block on the
/// cell and reuse the identical result.
///
/// Create one cache per conversion run and pass it in; nothing here is
/// process-global.
#[derive(Debug, Default)]
pub struct MaterialCache {
    cells: DashMap<String, Arc<OnceLock<Arc<FaceMaterials>>>>,
}

impl MaterialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a block name, resolving it on first use
    pub fn get_or_resolve(&self, name: &str, resolver: &Resolver) -> Arc<FaceMaterials> {
        // Clone the cell out of the shard so resolution runs without
        // holding any map lock; same-key callers serialize on the cell.
        let cell = self.cells.entry(name.to_string()).or_default().clone();
        cell.get_or_init(|| resolver.resolve(name)).clone()
    }

    /// Number of distinct block names seen so far
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
