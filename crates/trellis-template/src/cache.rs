//! Template path to stub resolution.
//!
//! `TemplateStubCache` memoizes the stub for each template path. The first
//! resolution of a path loads a fresh stub from the deployment loader and
//! races to publish it with an atomic insert-if-absent:
//!
//! 1. **Hit**: the published stub is returned.
//! 2. **Miss**: the stub id is synthesized and the stub loaded, holding no
//!    map lock, so misses on different paths proceed in parallel.
//! 3. **Publish**: the first insert wins. A losing instance is dropped
//!    without ever being initialized and the winner is adopted.
//! 4. **Init**: the winner's `init` runs at most once, guarded by a
//!    `OnceLock`. Every caller goes through the same guard before the stub
//!    is handed out, so init happens-before any use.
//!
//! Paths are keyed without their extension: `a/b` and `a/b.gtmpl` share the
//! stub `a.b_`. A stub whose init fails or panics is evicted, and the next
//! resolution loads a fresh instance. Successful entries are never evicted.

use crate::descriptor::TemplatesDescriptor;
use crate::error::{StubLoadError, TemplateError};
use crate::stub::{StubLoader, TemplateStub};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;
use tracing::{debug, trace, warn};
use trellis_common::TemplatePath;

/// A published stub and its one-shot initialization guard.
struct StubEntry {
    id: String,
    stub: Arc<dyn TemplateStub>,
    init_started: AtomicBool,
    initialized: OnceLock<Result<(), StubLoadError>>,
}

type StubMap = DashMap<TemplatePath, Arc<StubEntry>>;

pub struct TemplateStubCache {
    descriptor: TemplatesDescriptor,
    loader: Arc<dyn StubLoader>,
    stubs: StubMap,
}

impl TemplateStubCache {
    pub fn new(descriptor: TemplatesDescriptor, loader: Arc<dyn StubLoader>) -> Self {
        Self {
            descriptor,
            loader,
            stubs: DashMap::new(),
        }
    }

    pub fn descriptor(&self) -> &TemplatesDescriptor {
        &self.descriptor
    }

    pub fn loader(&self) -> &Arc<dyn StubLoader> {
        &self.loader
    }

    /// Resolve `path` to its initialized stub, loading it on first use.
    ///
    /// A load or init failure is returned to the caller and leaves nothing
    /// cached, so a later call retries with a fresh instance.
    pub fn resolve(&self, path: &TemplatePath) -> Result<Arc<dyn TemplateStub>, StubLoadError> {
        let key = path.without_extension();

        // Clone out of the map so no shard guard is held during init.
        let hit = self.stubs.get(&key).map(|entry| Arc::clone(entry.value()));
        if let Some(entry) = hit {
            trace!(%path, "template stub cache hit");
            return self.publish(&key, &entry);
        }

        let id = self.descriptor.stub_id(&key);
        debug!(%path, %id, "template stub cache miss, loading");
        let stub: Arc<dyn TemplateStub> = match self.loader.load(&id) {
            Ok(stub) => Arc::from(stub),
            Err(err) => {
                warn!(%path, %id, error = %err, "failed to load template stub");
                return Err(err);
            }
        };

        let entry = match self.stubs.entry(key.clone()) {
            Entry::Occupied(existing) => {
                debug!(%path, "template stub published concurrently, discarding loaded instance");
                Arc::clone(existing.get())
            }
            Entry::Vacant(slot) => {
                let entry = Arc::new(StubEntry {
                    id,
                    stub,
                    init_started: AtomicBool::new(false),
                    initialized: OnceLock::new(),
                });
                slot.insert(Arc::clone(&entry));
                entry
            }
        };
        self.publish(&key, &entry)
    }

    /// Parse `path` and resolve it.
    pub fn resolve_str(&self, path: &str) -> Result<Arc<dyn TemplateStub>, TemplateError> {
        let path = TemplatePath::parse(path)?;
        Ok(self.resolve(&path)?)
    }

    /// Run the entry's one-time init if nobody has yet, then hand out the stub.
    ///
    /// Concurrent callers block on the guard until init has finished and all
    /// observe the same outcome.
    fn publish(
        &self,
        key: &TemplatePath,
        entry: &Arc<StubEntry>,
    ) -> Result<Arc<dyn TemplateStub>, StubLoadError> {
        let outcome = entry.initialized.get_or_init(|| {
            // A waiter re-entering after a panicked init must not run it again.
            if entry.init_started.swap(true, Ordering::AcqRel) {
                return Err(StubLoadError::Initialization {
                    id: entry.id.clone(),
                    reason: "initialization panicked".to_string(),
                });
            }
            let _evict = EvictOnPanic {
                stubs: &self.stubs,
                key,
                entry,
            };
            debug!(path = %key, id = %entry.id, "initializing template stub");
            entry
                .stub
                .init(self.loader.as_ref())
                .map_err(|reason| StubLoadError::Initialization {
                    id: entry.id.clone(),
                    reason,
                })
        });

        match outcome {
            Ok(()) => Ok(Arc::clone(&entry.stub)),
            Err(err) => {
                warn!(path = %key, error = %err, "template stub failed to initialize, evicting");
                evict(&self.stubs, key, entry);
                Err(err.clone())
            }
        }
    }

    pub fn contains(&self, path: &TemplatePath) -> bool {
        self.stubs.contains_key(&path.without_extension())
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }
}

/// Remove `entry` from the map unless it has already been replaced.
fn evict(stubs: &StubMap, key: &TemplatePath, entry: &Arc<StubEntry>) {
    stubs.remove_if(key, |_, current| Arc::ptr_eq(current, entry));
}

/// Evicts the entry if `init` unwinds out of the guard.
struct EvictOnPanic<'a> {
    stubs: &'a StubMap,
    key: &'a TemplatePath,
    entry: &'a Arc<StubEntry>,
}

impl Drop for EvictOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            evict(self.stubs, self.key, self.entry);
        }
    }
}

#[cfg(test)]
#[path = "../tests/cache_tests.rs"]
mod tests;
