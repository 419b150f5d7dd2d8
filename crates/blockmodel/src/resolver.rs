use crate::face::Face;
use crate::material::{FaceMaterials, Material, Texture};
use crate::model::ElementFace;
use crate::store::{strip_namespace, ModelStore};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Upper bound on parent-chain hops and indirection hops. A malformed
/// cyclic chain degrades to fallback materials instead of looping.
const MAX_CHAIN_STEPS: usize = 16;

/// Diagnostic counters for one conversion run. None of these affect
/// control flow.
#[derive(Debug, Default)]
pub struct ResolverStats {
    resolutions: AtomicUsize,
    model_misses: AtomicUsize,
    texture_misses: AtomicUsize,
    dead_ends: AtomicUsize,
    chain_overflows: AtomicUsize,
}

impl ResolverStats {
    /// How many times the full resolution algorithm ran
    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    pub fn model_misses(&self) -> usize {
        self.model_misses.load(Ordering::Relaxed)
    }

    pub fn texture_misses(&self) -> usize {
        self.texture_misses.load(Ordering::Relaxed)
    }

    pub fn dead_ends(&self) -> usize {
        self.dead_ends.load(Ordering::Relaxed)
    }

    pub fn chain_overflows(&self) -> usize {
        self.chain_overflows.load(Ordering::Relaxed)
    }
}

/// One texture variable in the working table
#[derive(Debug, Clone)]
enum Variable {
    /// Concrete, loaded texture
    Texture(Arc<Texture>),
    /// `#other` reference into the same table
    Indirect(String),
    /// Declared, but its texture file could not be loaded
    Unresolved,
}

/// Resolves one block name to a six-face material set.
///
/// Stateless across calls apart from diagnostics; memoization is the
/// [`crate::MaterialCache`]'s job.
#[derive(Debug)]
pub struct Resolver {
    store: ModelStore,
    stats: ResolverStats,
}

impl Resolver {
    pub fn new(store: ModelStore) -> Self {
        Self {
            store,
            stats: ResolverStats::default(),
        }
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    /// Resolve a qualified block name to its face materials.
    ///
    /// Never fails: every miss along the way (model, parent, texture,
    /// indirection) is warned about and degrades to the fallback tint at
    /// the smallest possible scope.
    pub fn resolve(&self, block_name: &str) -> Arc<FaceMaterials> {
        self.stats.resolutions.fetch_add(1, Ordering::Relaxed);

        let key = strip_namespace(block_name);
        let Some(mut current) = self.store.model(key) else {
            self.stats.model_misses.fetch_add(1, Ordering::Relaxed);
            warn!(block = block_name, "no model definition, using fallback materials");
            return Arc::new(FaceMaterials::uniform_fallback());
        };

        let mut table: HashMap<String, Variable> = HashMap::new();
        let mut face_map: Option<HashMap<String, ElementFace>> = None;
        let mut hops = 0;

        // Iterative walk up the parent chain; a bounded hop counter stands
        // in for recursion so cyclic chains cannot grow the stack.
        loop {
            self.merge_textures(&current.textures, &mut table);

            if let Some(elements) = &current.elements {
                // Only the first element's face map is honored; models built
                // from several cuboids mesh as a single solid cube.
                face_map = elements.first().map(|e| e.faces.clone());
                break;
            }

            let Some(parent) = current.parent.clone() else {
                break;
            };

            hops += 1;
            if hops > MAX_CHAIN_STEPS {
                self.stats.chain_overflows.fetch_add(1, Ordering::Relaxed);
                warn!(
                    block = block_name,
                    max = MAX_CHAIN_STEPS,
                    "parent chain too deep, giving up on elements"
                );
                break;
            }

            let parent_key = strip_namespace(&parent);
            match self.store.model(parent_key) {
                Some(model) => current = model,
                None => {
                    self.stats.model_misses.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        block = block_name,
                        parent = parent_key,
                        "parent model definition not found"
                    );
                    break;
                }
            }
        }

        let mut materials = FaceMaterials::uniform_fallback();
        let face_map = face_map.unwrap_or_default();

        for face in Face::iter() {
            let Some(entry) = face_map.get(face.name()) else {
                continue;
            };
            let variable = entry.texture.strip_prefix('#').unwrap_or(&entry.texture);
            match self.chase(variable, &table) {
                Some(texture) => materials.set(face, Material::Texture(texture)),
                None => {
                    self.stats.dead_ends.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        block = block_name,
                        face = face.name(),
                        variable,
                        "unresolved face texture, keeping fallback tint"
                    );
                }
            }
        }

        Arc::new(materials)
    }

    /// Merge one definition's texture variables into the working table.
    ///
    /// Entries already concretely resolved are never overridden; anything
    /// else (indirections, unresolved slots) yields to the deeper
    /// declaration. Direct references load their image eagerly.
    fn merge_textures(
        &self,
        declared: &HashMap<String, String>,
        table: &mut HashMap<String, Variable>,
    ) {
        for (name, value) in declared {
            if matches!(table.get(name), Some(Variable::Texture(_))) {
                continue;
            }
            let variable = if let Some(target) = value.strip_prefix('#') {
                Variable::Indirect(target.to_string())
            } else {
                match self.store.texture(strip_namespace(value)) {
                    Some(texture) => Variable::Texture(texture),
                    None => {
                        self.stats.texture_misses.fetch_add(1, Ordering::Relaxed);
                        warn!(
                            variable = name.as_str(),
                            reference = value.as_str(),
                            "texture not loadable, variable left unresolved"
                        );
                        Variable::Unresolved
                    }
                }
            };
            table.insert(name.clone(), variable);
        }
    }

    /// Follow `#variable` indirections until a concrete texture or a dead
    /// end, with a step bound against reference cycles.
    fn chase(&self, variable: &str, table: &HashMap<String, Variable>) -> Option<Arc<Texture>> {
        let mut name = variable;
        for _ in 0..MAX_CHAIN_STEPS {
            match table.get(name) {
                Some(Variable::Texture(texture)) => return Some(texture.clone()),
                Some(Variable::Indirect(target)) => name = target,
                Some(Variable::Unresolved) | None => return None,
            }
        }
        self.stats.chain_overflows.fetch_add(1, Ordering::Relaxed);
        None
    }
}
