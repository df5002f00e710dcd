//! Centralized integration tests for extern-impl crate
use anyhow::Result;
use crossbinder_common::{LifecycleError, ResolutionError};
use crossbinder_composition::{CrossbinderInfrastructure, ExternBootstrapper};
use extern_abstractions::{ExternalTarget, LifecycleInterceptor, Managed};
use extern_impl::{ExternInterceptor, ExternalObject, ExternalRegistry};
use extern_macros::{extern_methods, ExternalTarget};
use parking_lot::Mutex;
use std::sync::Arc;

pub trait Foo: Send + Sync {
    fn id(&self) -> &'static str;
}

pub trait Bar: Send + Sync {
    fn size(&self) -> usize;
}

struct FooX;

impl Foo for FooX {
    fn id(&self) -> &'static str {
        "x"
    }
}

struct OnlyFoo;

impl Foo for OnlyFoo {
    fn id(&self) -> &'static str {
        "only-foo"
    }
}

struct SizedBar(usize);

impl Bar for SizedBar {
    fn size(&self) -> usize {
        self.0
    }
}

fn foo_x() -> ExternalObject {
    ExternalObject::new(FooX).provides::<dyn Foo>(|f| f).build()
}

fn bar(size: usize) -> ExternalObject {
    ExternalObject::new(SizedBar(size))
        .provides::<dyn Bar>(|b| b)
        .build()
}

fn interceptor(registry: ExternalRegistry) -> ExternInterceptor {
    ExternInterceptor::new(Arc::new(registry))
}

#[derive(Default, ExternalTarget)]
struct OptionalHolder {
    #[external(optional)]
    foo: Option<Arc<dyn Foo>>,
}

#[derive(Default, ExternalTarget)]
struct RequiredHolder {
    #[external]
    foo: Option<Arc<dyn Foo>>,
}

#[derive(Default, ExternalTarget)]
struct CacheHolder {
    #[external("cache")]
    cache: Option<Arc<dyn Bar>>,
}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
struct Configured {
    calls: Vec<(String, usize)>,
}

#[extern_methods]
impl Configured {
    pub fn configure(&mut self, #[external] foo: Arc<dyn Foo>, #[external] bar: Arc<dyn Bar>) {
        self.calls.push((foo.id().to_string(), bar.size()));
    }

    pub fn skipped(&mut self, #[external] foo: Arc<dyn Foo>, label: String) {
        self.calls.push((format!("{}:{}", foo.id(), label), 0));
    }

    pub fn unannotated(&mut self, foo: Arc<dyn Foo>) {
        self.calls.push((format!("unannotated:{}", foo.id()), 0));
    }

    pub fn count(&self, #[external] _foo: Arc<dyn Foo>) -> usize {
        self.calls.len()
    }

    pub fn shared() {}

    #[allow(dead_code)]
    fn private_helper(&mut self, #[external] foo: Arc<dyn Foo>) {
        self.calls.push((format!("private:{}", foo.id()), 0));
    }
}

#[derive(Default, ExternalTarget)]
struct Grandparent {
    #[external(name = "bar")]
    bar: Option<Arc<dyn Bar>>,
}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
struct Parent {
    #[extern_parent]
    base: Grandparent,
    #[external(optional)]
    foo: Option<Arc<dyn Foo>>,
    seen: Vec<&'static str>,
}

#[extern_methods]
impl Parent {
    pub fn attach(&mut self, #[external] foo: Arc<dyn Foo>) -> Result<(), String> {
        self.seen.push(foo.id());
        Ok(())
    }
}

#[derive(Default, ExternalTarget)]
struct Child {
    #[extern_parent]
    base: Parent,
    #[external]
    own: Option<Arc<dyn Foo>>,
}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
struct Picky;

#[extern_methods]
impl Picky {
    pub fn check(&mut self, #[external] bar: Arc<dyn Bar>) -> Result<(), String> {
        if bar.size() == 0 {
            return Err("empty bar".to_string());
        }
        Ok(())
    }
}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
struct Lenient {
    received: Option<Option<&'static str>>,
}

#[extern_methods]
impl Lenient {
    pub fn accept(&mut self, #[external(optional)] foo: Option<Arc<dyn Foo>>) {
        self.received = Some(foo.map(|f| f.id()));
    }
}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
struct Strict {
    called: bool,
}

#[extern_methods]
impl Strict {
    pub fn need(&mut self, #[external("missing")] foo: Arc<dyn Foo>) {
        drop(foo);
        self.called = true;
    }
}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
struct Guarded {
    called: bool,
}

#[extern_methods]
impl Guarded {
    pub fn set(&mut self, #[external] foo: Option<Arc<dyn Foo>>) {
        drop(foo);
        self.called = true;
    }
}

#[test]
fn test_anonymous_optional_field_is_injected() -> Result<()> {
    let interceptor = interceptor(ExternalRegistry::builder().add(foo_x()).build());
    let mut holder = OptionalHolder::default();

    interceptor.resolve(&mut holder)?;

    assert_eq!(holder.foo.map(|f| f.id()), Some("x"));
    Ok(())
}

#[test]
fn test_required_field_without_candidate_fails() {
    let interceptor = interceptor(ExternalRegistry::builder().add(bar(1)).build());
    let mut holder = RequiredHolder::default();

    let err = interceptor.resolve(&mut holder).unwrap_err();

    assert!(err.is_not_found());
    assert!(err.owner().ends_with("RequiredHolder"));
    assert_eq!(err.member(), Some("foo"));
    assert!(err.to_string().contains("RequiredHolder#foo"));
}

#[test]
fn test_named_candidate_without_capability_is_not_found() {
    let registry = ExternalRegistry::builder()
        .add_named("cache", ExternalObject::new(OnlyFoo).provides::<dyn Foo>(|f| f))
        .unwrap()
        .build();
    assert!(registry.contains_name("cache"));
    let interceptor = interceptor(registry);
    let mut holder = CacheHolder::default();

    let err = interceptor.resolve(&mut holder).unwrap_err();

    assert!(matches!(err, ResolutionError::FieldTargetNotFound { .. }));
    assert!(holder.cache.is_none());
}

#[test]
fn test_method_with_capability_params_is_invoked_once_in_order() -> Result<()> {
    let interceptor = interceptor(ExternalRegistry::builder().add(foo_x()).add(bar(3)).build());
    let mut configured = Configured::default();

    interceptor.resolve(&mut configured)?;

    assert_eq!(configured.calls, vec![("x".to_string(), 3)]);
    Ok(())
}

#[test]
fn test_method_list_contains_public_functions_only() {
    let descriptor = Configured::type_descriptor();
    let names: Vec<_> = descriptor.methods().iter().map(|m| m.name).collect();

    assert_eq!(names, vec!["configure", "skipped", "unannotated", "count", "shared"]);
    assert!(descriptor.method("shared").unwrap().is_static());
    assert!(!descriptor.method("count").unwrap().returns_unit());
    assert!(descriptor.method("configure").unwrap().is_invocable());
    assert!(!descriptor.method("skipped").unwrap().is_invocable());
}

#[test]
fn test_fields_and_methods_resolve_across_ancestors() -> Result<()> {
    let infrastructure = ExternBootstrapper::new()
        .add(foo_x())
        .add_named("bar", bar(7))?
        .bootstrap()?;

    let child = infrastructure.create(Child::default)?;

    assert_eq!(child.own.as_ref().map(|f| f.id()), Some("x"));
    assert_eq!(child.base.foo.as_ref().map(|f| f.id()), Some("x"));
    assert_eq!(child.base.base.bar.as_ref().map(|b| b.size()), Some(7));
    assert_eq!(child.base.seen, vec!["x"]);
    Ok(())
}

#[test]
fn test_fallible_method_error_is_reported() {
    let interceptor = interceptor(ExternalRegistry::builder().add(bar(0)).build());
    let mut picky = Picky;

    let err = interceptor.resolve(&mut picky).unwrap_err();

    match err {
        ResolutionError::MethodInvocation { owner, method, .. } => {
            assert!(owner.ends_with("Picky"));
            assert_eq!(method, "check");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_optional_parameter_miss_passes_none() -> Result<()> {
    let interceptor = interceptor(ExternalRegistry::default());
    let mut lenient = Lenient::default();

    interceptor.resolve(&mut lenient)?;

    assert_eq!(lenient.received, Some(None));
    Ok(())
}

#[test]
fn test_required_parameter_miss_fails() {
    let interceptor = interceptor(ExternalRegistry::builder().add(foo_x()).build());
    let mut strict = Strict::default();

    let err = interceptor.resolve(&mut strict).unwrap_err();

    assert!(matches!(
        &err,
        ResolutionError::ParameterTargetNotFound { parameter, .. } if parameter == "foo"
    ));
    assert!(err.to_string().contains("need->foo"));
    assert!(!strict.called);
}

struct InjectionProbe {
    observed: Arc<Mutex<Vec<bool>>>,
}

impl LifecycleInterceptor for InjectionProbe {
    fn after_injection(&self, target: &mut dyn Managed) -> Result<(), LifecycleError> {
        let resolved = target
            .as_any_mut()
            .downcast_mut::<OptionalHolder>()
            .map(|holder| holder.foo.is_some())
            .unwrap_or(false);
        self.observed.lock().push(resolved);
        Ok(())
    }
}

#[test]
fn test_extern_interceptor_runs_before_additional_interceptors() -> Result<()> {
    let observed = Arc::new(Mutex::new(Vec::new()));
    let infrastructure = CrossbinderInfrastructure::builder()
        .add(foo_x())
        .add_interceptor(Arc::new(InjectionProbe {
            observed: observed.clone(),
        }))
        .bootstrap()?;

    let holder = infrastructure.create(OptionalHolder::default)?;
    infrastructure.dispose(holder)?;

    assert_eq!(*observed.lock(), vec![true]);
    assert_eq!(infrastructure.chain().len(), 2);
    Ok(())
}

#[test]
fn test_named_registration_last_write_wins() -> Result<()> {
    let infrastructure = ExternBootstrapper::new()
        .add_named("cache", bar(1))?
        .add_named("cache", bar(2))?
        .bootstrap()?;

    let holder = infrastructure.create(CacheHolder::default)?;

    assert_eq!(holder.cache.map(|c| c.size()), Some(2));
    Ok(())
}

#[test]
fn test_concurrent_resolution_against_frozen_registry() {
    let interceptor = Arc::new(interceptor(
        ExternalRegistry::builder().add(foo_x()).add(bar(5)).build(),
    ));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let interceptor = interceptor.clone();
            scope.spawn(move || {
                let mut configured = Configured::default();
                interceptor.resolve(&mut configured).unwrap();
                assert_eq!(configured.calls, vec![("x".to_string(), 5)]);
            });
        }
    });

    assert_eq!(interceptor.resolver().cached_descriptor_count(), 1);
}

#[test]
fn test_required_option_parameter_is_not_optional() {
    let descriptor = Guarded::type_descriptor();
    let set = descriptor.method("set").unwrap();
    assert!(!set.params[0].binding.as_ref().unwrap().is_optional());

    let interceptor = interceptor(ExternalRegistry::default());
    let mut guarded = Guarded::default();

    let err = interceptor.resolve(&mut guarded).unwrap_err();

    assert!(matches!(
        &err,
        ResolutionError::ParameterTargetNotFound { method, parameter, .. }
            if method == "set" && parameter == "foo"
    ));
    assert!(!guarded.called);
}

#[test]
fn test_required_option_parameter_receives_some() -> Result<()> {
    let interceptor = interceptor(ExternalRegistry::builder().add(foo_x()).build());
    let mut guarded = Guarded::default();

    interceptor.resolve(&mut guarded)?;

    assert!(guarded.called);
    Ok(())
}
