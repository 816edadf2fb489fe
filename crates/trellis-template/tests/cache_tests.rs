use super::*;
use crate::context::TemplateRenderContext;
use crate::error::RenderError;
use crate::stub::StubRegistry;
use crate::test_stubs::{Counters, CountingStub, addr, counting_registry};
use rayon::prelude::*;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Barrier, Mutex};
use std::thread;
use std::time::Duration;
use trellis_common::QualifiedName;

fn descriptor() -> TemplatesDescriptor {
    TemplatesDescriptor::new(QualifiedName::parse("app.templates").unwrap())
}

fn path(s: &str) -> TemplatePath {
    TemplatePath::parse(s).unwrap()
}

#[test]
fn test_resolve_loads_and_initializes_once() {
    let counters = Arc::new(Counters::default());
    let registry = counting_registry(&["app.templates.index_"], &counters);
    let cache = TemplateStubCache::new(descriptor(), Arc::new(registry));

    let first = cache.resolve(&path("index.gtmpl")).unwrap();
    let second = cache.resolve(&path("index.gtmpl")).unwrap();

    assert_eq!(addr(&first), addr(&second));
    assert_eq!(counters.created(), 1);
    assert_eq!(counters.initialized(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&path("index.gtmpl")));
}

#[test]
fn test_concurrent_first_access_initializes_one_instance() {
    const THREADS: usize = 16;

    let counters = Arc::new(Counters::default());
    let mut registry = StubRegistry::new();
    {
        let counters = Arc::clone(&counters);
        registry.register("app.templates.a.b_", move || {
            // Widen the window in which every thread is past the cache lookup.
            thread::sleep(Duration::from_millis(20));
            Ok(Box::new(CountingStub::new("a.b", Arc::clone(&counters))) as Box<dyn TemplateStub>)
        });
    }
    let cache = Arc::new(TemplateStubCache::new(descriptor(), Arc::new(registry)));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let stub = cache.resolve(&path("a/b")).unwrap();
                addr(&stub) as usize
            })
        })
        .collect();
    let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(addrs.iter().all(|&a| a == addrs[0]));
    assert!(counters.created() >= 1);
    assert_eq!(counters.initialized(), 1);

    // A later call neither reloads nor re-initializes.
    let created = counters.created();
    let again = cache.resolve(&path("a/b")).unwrap();
    assert_eq!(addr(&again) as usize, addrs[0]);
    assert_eq!(counters.created(), created);
    assert_eq!(counters.initialized(), 1);
}

#[test]
fn test_distinct_paths_yield_distinct_stubs() {
    let counters = Arc::new(Counters::default());
    let registry = counting_registry(&["app.templates.a.b_", "app.templates.a.c_"], &counters);
    let cache = TemplateStubCache::new(descriptor(), Arc::new(registry));

    let b = cache.resolve(&path("a/b")).unwrap();
    let c = cache.resolve(&path("a/c")).unwrap();
    assert_ne!(addr(&b), addr(&c));
    assert_eq!(counters.initialized(), 2);
}

#[test]
fn test_miss_on_one_path_does_not_block_another() {
    let counters = Arc::new(Counters::default());
    let (tx, rx) = mpsc::channel::<()>();
    let rx = Mutex::new(rx);

    let mut registry = counting_registry(&["app.templates.a.c_"], &counters);
    {
        let counters = Arc::clone(&counters);
        registry.register("app.templates.a.b_", move || {
            // Only finishes once a/c has been resolved elsewhere.
            let rx = rx.lock().map_err(|e| e.to_string())?;
            rx.recv_timeout(Duration::from_secs(5))
                .map_err(|_| "a/c never resolved while a/b was loading".to_string())?;
            Ok(Box::new(CountingStub::new("a.b", Arc::clone(&counters))) as Box<dyn TemplateStub>)
        });
    }
    let cache = Arc::new(TemplateStubCache::new(descriptor(), Arc::new(registry)));

    let slow = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || cache.resolve(&path("a/b")).map(|stub| addr(&stub) as usize))
    };
    thread::sleep(Duration::from_millis(20));
    let c = cache.resolve(&path("a/c")).unwrap();
    tx.send(()).unwrap();

    let b = slow.join().unwrap().unwrap();
    assert_ne!(b, addr(&c) as usize);
}

#[test]
fn test_load_failure_is_typed_and_not_cached() {
    let mut registry = StubRegistry::new();
    registry.register("app.templates.broken_", || Err("constructor threw".to_string()));
    let cache = TemplateStubCache::new(descriptor(), Arc::new(registry));

    let missing = cache.resolve(&path("missing")).err().unwrap();
    assert_eq!(
        missing,
        StubLoadError::NotFound {
            id: "app.templates.missing_".to_string()
        }
    );

    let broken = cache.resolve(&path("broken")).err().unwrap();
    assert!(matches!(
        broken,
        StubLoadError::Instantiation { ref id, ref reason }
            if id == "app.templates.broken_" && reason == "constructor threw"
    ));
    assert!(cache.is_empty());
}

#[test]
fn test_resolve_str_reports_bad_paths() {
    let counters = Arc::new(Counters::default());
    let registry = counting_registry(&["app.templates.a.b_"], &counters);
    let cache = TemplateStubCache::new(descriptor(), Arc::new(registry));

    assert!(cache.resolve_str("a/b.gtmpl").is_ok());
    assert!(matches!(
        cache.resolve_str("a//b"),
        Err(TemplateError::InvalidPath(_))
    ));
    assert!(matches!(
        cache.resolve_str("a/z"),
        Err(TemplateError::Load(StubLoadError::NotFound { .. }))
    ));
}

#[test]
fn test_parallel_resolution_of_many_paths() {
    let counters = Arc::new(Counters::default());
    let ids: Vec<String> = (0..8).map(|i| format!("app.templates.t{i}_")).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let registry = counting_registry(&id_refs, &counters);
    let cache = TemplateStubCache::new(descriptor(), Arc::new(registry));

    (0..400).into_par_iter().for_each(|i| {
        let stub = cache.resolve(&path(&format!("t{}", i % 8))).unwrap();
        assert!(!addr(&stub).is_null());
    });

    assert_eq!(cache.len(), 8);
    assert_eq!(counters.initialized(), 8);
}

#[test]
fn test_paths_differing_only_in_extension_share_a_stub() {
    let counters = Arc::new(Counters::default());
    let registry = counting_registry(&["app.templates.a.b_"], &counters);
    let cache = TemplateStubCache::new(descriptor(), Arc::new(registry));

    let bare = cache.resolve(&path("a/b")).unwrap();
    let with_ext = cache.resolve(&path("a/b.gtmpl")).unwrap();

    assert_eq!(addr(&bare), addr(&with_ext));
    assert_eq!(counters.created(), 1);
    assert_eq!(counters.initialized(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(&path("a/b.gtmpl")));
}

/// How a `FlakyStub` instance behaves on init.
#[derive(Clone, Copy)]
enum InitOutcome {
    Succeed,
    Fail,
    Panic,
}

/// Counts init calls on each instance; the first instance built by its
/// factory misbehaves according to `first`.
struct FlakyStub {
    outcome: InitOutcome,
    init_calls: AtomicUsize,
}

impl TemplateStub for FlakyStub {
    fn init(&self, _loader: &dyn StubLoader) -> Result<(), String> {
        let calls = self.init_calls.fetch_add(1, Ordering::SeqCst) + 1;
        assert_eq!(calls, 1, "same stub instance initialized {calls} times");
        match self.outcome {
            InitOutcome::Succeed => Ok(()),
            InitOutcome::Fail => Err("missing resource bundle".to_string()),
            InitOutcome::Panic => panic!("init blew up"),
        }
    }

    fn render(
        &self,
        _ctx: &TemplateRenderContext,
        _out: &mut dyn fmt::Write,
    ) -> Result<(), RenderError> {
        Ok(())
    }
}

fn flaky_registry(first: InitOutcome, built: &Arc<AtomicUsize>) -> StubRegistry {
    let mut registry = StubRegistry::new();
    let built = Arc::clone(built);
    registry.register("app.templates.p_", move || {
        let outcome = match built.fetch_add(1, Ordering::SeqCst) {
            0 => first,
            _ => InitOutcome::Succeed,
        };
        Ok(Box::new(FlakyStub {
            outcome,
            init_calls: AtomicUsize::new(0),
        }) as Box<dyn TemplateStub>)
    });
    registry
}

#[test]
fn test_failed_init_evicts_and_retries_with_fresh_instance() {
    let built = Arc::new(AtomicUsize::new(0));
    let cache = TemplateStubCache::new(
        descriptor(),
        Arc::new(flaky_registry(InitOutcome::Fail, &built)),
    );

    let err = cache.resolve(&path("p")).err().unwrap();
    assert_eq!(
        err,
        StubLoadError::Initialization {
            id: "app.templates.p_".to_string(),
            reason: "missing resource bundle".to_string(),
        }
    );
    assert!(cache.is_empty());

    let first = cache.resolve(&path("p")).unwrap();
    let second = cache.resolve(&path("p")).unwrap();
    assert_eq!(addr(&first), addr(&second));
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[test]
fn test_panicking_init_never_reinitializes_the_same_instance() {
    let built = Arc::new(AtomicUsize::new(0));
    let cache = TemplateStubCache::new(
        descriptor(),
        Arc::new(flaky_registry(InitOutcome::Panic, &built)),
    );

    let unwound = panic::catch_unwind(AssertUnwindSafe(|| cache.resolve(&path("p"))));
    assert!(unwound.is_err());
    assert!(!cache.contains(&path("p")));

    // FlakyStub asserts each instance sees a single init call.
    let stub = cache.resolve(&path("p")).unwrap();
    let again = cache.resolve(&path("p")).unwrap();
    assert_eq!(addr(&stub), addr(&again));
    assert_eq!(built.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 1);
}
