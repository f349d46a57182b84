use super::error::{ReleaseError, ScopeError};
use super::handle::Releasable;

/// Stack-disciplined registry of GPU resources.
///
/// Resources are released in exact reverse registration order when the scope
/// closes, either explicitly through [`ResourceScope::close`] or on drop.
/// Nested scopes are independent values created with [`ResourceScope::child`];
/// a resource belongs to exactly one scope at a time.
pub struct ResourceScope {
    name: String,
    depth: usize,
    entries: Vec<Box<dyn Releasable>>,
    closed: bool,
}

impl ResourceScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depth: 0,
            entries: Vec::new(),
            closed: false,
        }
    }

    /// Opens a nested scope. The child must be closed before its parent for
    /// release order to stay stack-shaped.
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depth: self.depth + 1,
            entries: Vec::new(),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Registers `resource` at the top of this scope and hands it back.
    ///
    /// Acquiring into a closed scope re-arms it; the next `close` releases the
    /// new registrations.
    pub fn acquire<R>(&mut self, resource: R) -> R
    where
        R: Releasable + Clone + 'static,
    {
        if self.closed {
            log::warn!(
                "scope '{}': acquiring {} '{}' after close; scope re-armed",
                self.name,
                resource.kind(),
                resource.label()
            );
            self.closed = false;
        }

        log::trace!(
            "scope '{}'[{}]: acquire {} '{}'",
            self.name,
            self.depth,
            resource.kind(),
            resource.label()
        );

        self.entries.push(Box::new(resource.clone()));
        resource
    }

    /// Moves the registration of `resource` from this scope into `parent`.
    ///
    /// Returns `false` when `resource` is not registered here.
    pub fn escape_to<R>(&mut self, parent: &mut ResourceScope, resource: &R) -> bool
    where
        R: Releasable + Clone + 'static,
    {
        let id = resource.id();
        let Some(pos) = self.entries.iter().rposition(|e| e.id() == id) else {
            return false;
        };

        self.entries.remove(pos);
        parent.acquire(resource.clone());
        true
    }

    /// Releases every registered resource, newest first.
    ///
    /// Failing releases do not stop the remaining ones; all failures are
    /// returned together. Closing an already closed scope does nothing.
    pub fn close(&mut self) -> Result<(), ScopeError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut failures: Vec<ReleaseError> = Vec::new();
        let count = self.entries.len();

        while let Some(entry) = self.entries.pop() {
            log::trace!(
                "scope '{}'[{}]: release {} '{}'",
                self.name,
                self.depth,
                entry.kind(),
                entry.label()
            );
            if let Err(e) = entry.release() {
                log::warn!("scope '{}': {e}", self.name);
                failures.push(e);
            }
        }

        log::debug!(
            "scope '{}' closed ({count} released, {} failed)",
            self.name,
            failures.len()
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ScopeError {
                scope: self.name.clone(),
                failures,
            })
        }
    }

    /// Runs `f` inside a fresh child scope and closes the child on every exit
    /// path, including `?` early returns inside `f`.
    ///
    /// Release failures of the child are logged; the value of `f` is returned.
    pub fn scoped<T>(&self, name: impl Into<String>, f: impl FnOnce(&mut ResourceScope) -> T) -> T {
        let mut child = self.child(name);
        let out = f(&mut child);
        if let Err(e) = child.close() {
            log::error!("{e}");
        }
        out
    }
}

impl Drop for ResourceScope {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::error!("{e}");
        }
    }
}

impl std::fmt::Debug for ResourceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceScope")
            .field("name", &self.name)
            .field("depth", &self.depth)
            .field("entries", &self.entries.len())
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::resource::ResourceKind;

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Records its label into a shared journal when released.
    #[derive(Clone)]
    struct Recorder {
        label: String,
        journal: Journal,
        released: Rc<RefCell<bool>>,
        fail: bool,
    }

    impl Recorder {
        fn new(label: &str, journal: &Journal) -> Self {
            Self {
                label: label.to_string(),
                journal: Rc::clone(journal),
                released: Rc::new(RefCell::new(false)),
                fail: false,
            }
        }

        fn failing(label: &str, journal: &Journal) -> Self {
            Self {
                fail: true,
                ..Self::new(label, journal)
            }
        }

        fn is_released(&self) -> bool {
            *self.released.borrow()
        }
    }

    impl Releasable for Recorder {
        fn kind(&self) -> ResourceKind {
            ResourceKind::Buffer
        }

        fn label(&self) -> &str {
            &self.label
        }

        fn id(&self) -> usize {
            Rc::as_ptr(&self.released) as usize
        }

        fn release(&self) -> Result<(), ReleaseError> {
            let mut released = self.released.borrow_mut();
            if *released {
                return Ok(());
            }
            *released = true;
            self.journal.borrow_mut().push(self.label.clone());
            if self.fail {
                return Err(ReleaseError::Failed {
                    kind: ResourceKind::Buffer,
                    label: self.label.clone(),
                    reason: "injected".into(),
                });
            }
            Ok(())
        }
    }

    fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn close_releases_in_reverse_acquisition_order() {
        // Seeded so every run covers the same shapes.
        let mut rng = fastrand::Rng::with_seed(0x5eed);

        for case in 0..200 {
            let log = journal();
            let mut scope = ResourceScope::new(format!("case-{case}"));

            let n = rng.usize(..24);
            let labels: Vec<String> = (0..n).map(|i| format!("r{i}-{}", rng.u32(..1000))).collect();
            for label in &labels {
                scope.acquire(Recorder::new(label, &log));
            }

            scope.close().unwrap();

            let expected: Vec<String> = labels.iter().rev().cloned().collect();
            assert_eq!(*log.borrow(), expected, "case {case}");
        }
    }

    #[test]
    fn acquire_returns_same_resource() {
        let log = journal();
        let mut scope = ResourceScope::new("chain");
        let original = Recorder::new("a", &log);
        let returned = scope.acquire(original.clone());
        assert_eq!(returned.id(), original.id());
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn second_close_is_noop() {
        let log = journal();
        let mut scope = ResourceScope::new("twice");
        scope.acquire(Recorder::new("a", &log));
        scope.acquire(Recorder::new("b", &log));

        scope.close().unwrap();
        scope.close().unwrap();
        drop(scope);

        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn drop_closes_scope() {
        let log = journal();
        {
            let mut scope = ResourceScope::new("raii");
            scope.acquire(Recorder::new("a", &log));
            scope.acquire(Recorder::new("b", &log));
        }
        assert_eq!(*log.borrow(), vec!["b", "a"]);
    }

    #[test]
    fn child_releases_independently_of_parent() {
        let log = journal();
        let mut parent = ResourceScope::new("parent");
        let outer = parent.acquire(Recorder::new("outer", &log));

        let mut child = parent.child("child");
        assert_eq!(child.depth(), 1);
        let inner = child.acquire(Recorder::new("inner", &log));
        child.close().unwrap();

        assert!(inner.is_released());
        assert!(!outer.is_released());
        assert_eq!(*log.borrow(), vec!["inner"]);

        parent.close().unwrap();
        assert!(outer.is_released());
        assert_eq!(*log.borrow(), vec!["inner", "outer"]);
    }

    #[test]
    fn scoped_closes_on_early_return() {
        let log = journal();
        let parent = ResourceScope::new("parent");
        let acquire_surface = || -> Result<(), &'static str> { Err("surface lost") };

        let result: Result<(), &str> = parent.scoped("frame", |scope| {
            scope.acquire(Recorder::new("view", &log));
            scope.acquire(Recorder::new("encoder", &log));
            acquire_surface()?;
            scope.acquire(Recorder::new("unreached", &log));
            Ok(())
        });

        assert!(result.is_err());
        assert_eq!(*log.borrow(), vec!["encoder", "view"]);
    }

    #[test]
    fn escaped_resource_outlives_child() {
        let log = journal();
        let mut parent = ResourceScope::new("parent");
        let mut child = parent.child("child");

        let kept = child.acquire(Recorder::new("kept", &log));
        child.acquire(Recorder::new("temp", &log));
        assert!(child.escape_to(&mut parent, &kept));
        child.close().unwrap();

        assert!(!kept.is_released());
        assert_eq!(*log.borrow(), vec!["temp"]);

        parent.close().unwrap();
        assert_eq!(*log.borrow(), vec!["temp", "kept"]);
    }

    #[test]
    fn escape_of_unknown_resource_is_rejected() {
        let log = journal();
        let mut parent = ResourceScope::new("parent");
        let mut child = parent.child("child");
        let stranger = Recorder::new("stranger", &log);
        assert!(!child.escape_to(&mut parent, &stranger));
        assert!(parent.is_empty());
    }

    #[test]
    fn failures_are_aggregated_and_release_continues() {
        let log = journal();
        let mut scope = ResourceScope::new("teardown");
        scope.acquire(Recorder::new("a", &log));
        scope.acquire(Recorder::failing("b", &log));
        scope.acquire(Recorder::new("c", &log));
        scope.acquire(Recorder::failing("d", &log));

        let err = scope.close().unwrap_err();
        assert_eq!(err.scope, "teardown");
        assert_eq!(err.failures.len(), 2);
        assert!(matches!(&err.failures[0], ReleaseError::Failed { label, .. } if label == "d"));
        assert!(matches!(&err.failures[1], ReleaseError::Failed { label, .. } if label == "b"));
        assert_eq!(*log.borrow(), vec!["d", "c", "b", "a"]);

        // Already closed; nothing left to fail.
        assert!(scope.close().is_ok());
    }

    #[test]
    fn acquire_after_close_rearms() {
        let log = journal();
        let mut scope = ResourceScope::new("rearm");
        scope.close().unwrap();
        assert!(scope.is_closed());

        scope.acquire(Recorder::new("late", &log));
        assert!(!scope.is_closed());
        scope.close().unwrap();
        assert_eq!(*log.borrow(), vec!["late"]);
    }

    #[test]
    fn gpu_handles_release_through_scope() {
        use crate::resource::{GpuHandle, GpuObject};

        struct Token(Journal, &'static str);
        impl GpuObject for Token {
            const KIND: ResourceKind = ResourceKind::TextureView;
            fn release(self) -> Result<(), String> {
                self.0.borrow_mut().push(self.1.to_string());
                Ok(())
            }
        }

        let log = journal();
        let mut scope = ResourceScope::new("handles");
        let first = GpuHandle::acquire_in(&mut scope, "first", Token(Rc::clone(&log), "first"));
        let second = GpuHandle::new("second", Token(Rc::clone(&log), "second")).register(&mut scope);

        scope.close().unwrap();
        assert!(!first.is_live());
        assert!(!second.is_live());
        assert_eq!(*log.borrow(), vec!["second", "first"]);
    }
}
