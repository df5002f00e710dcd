//! Centralized integration tests for extern-macros crate

use anyhow::{Context, Result};
use extern_abstractions::{CapabilityKind, ExternalTarget, TypeInfo};
use extern_impl::{ExternInterceptor, ExternalObject, ExternalRegistry};
use extern_macros::{extern_methods, ExternalTarget};
use std::sync::Arc;

pub trait Storage: Send + Sync {
    fn bucket(&self) -> &str;
}

pub trait Metrics: Send + Sync {}

pub struct LocalStorage(&'static str);

impl Storage for LocalStorage {
    fn bucket(&self) -> &str {
        self.0
    }
}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
pub struct ReportService {
    #[external]
    storage: Option<Arc<dyn Storage>>,
    #[external("archive")]
    archive: Option<Arc<dyn Storage>>,
    #[external(name = " primary ", value = "secondary", optional)]
    mirror: Option<Arc<dyn Storage>>,
    #[external(value = "local")]
    local: Option<Arc<LocalStorage>>,
    buckets: Vec<String>,
}

#[extern_methods]
impl ReportService {
    pub fn collect(
        &mut self,
        #[external("archive")] archive: Arc<dyn Storage>,
        #[external(optional)] metrics: Option<Arc<dyn Metrics>>,
    ) {
        self.buckets.push(archive.bucket().to_string());
        if metrics.is_some() {
            self.buckets.push("metrics".to_string());
        }
    }

    pub fn pin(&mut self, #[external] local: Arc<LocalStorage>) {
        self.buckets.push(format!("pinned:{}", local.bucket()));
    }

    pub fn wire(&mut self, storage: Arc<dyn Storage>, limit: usize) {
        self.buckets.push(format!("{}:{}", storage.bucket(), limit));
    }
}

fn registry() -> Result<ExternalRegistry> {
    let registry = ExternalRegistry::builder()
        .add(ExternalObject::new(LocalStorage("default")).provides::<dyn Storage>(|s| s))
        .add_named(
            "archive",
            ExternalObject::new(LocalStorage("archive")).provides::<dyn Storage>(|s| s),
        )?
        .build();
    Ok(registry)
}

#[test]
fn test_field_bindings_from_attributes() {
    let descriptor = ReportService::type_descriptor();
    let fields = descriptor.fields();
    assert_eq!(fields.len(), 4);

    assert_eq!(fields[0].name, "storage");
    assert!(!fields[0].binding.is_named());
    assert!(!fields[0].binding.is_optional());
    assert_eq!(fields[0].declared_type, TypeInfo::of::<dyn Storage>());

    assert_eq!(fields[1].binding.declared_name(), Some("archive"));

    assert_eq!(fields[2].binding.declared_name(), Some("primary"));
    assert!(fields[2].binding.is_optional());

    assert_eq!(fields[3].binding.declared_name(), Some("local"));
    assert_eq!(fields[3].declared_type, TypeInfo::of::<LocalStorage>());
    assert!(fields.iter().all(|f| !f.is_static()));
}

#[test]
fn test_method_params_from_attributes() -> Result<()> {
    let descriptor = ReportService::type_descriptor();

    let collect = descriptor.method("collect").context("collect 未生成")?;
    assert_eq!(collect.params.len(), 2);
    assert!(collect.params.iter().all(|p| p.is_injectable()));
    assert_eq!(collect.params[0].name, "archive");
    assert!(collect.params[1].binding.as_ref().unwrap().is_optional());
    assert!(collect.is_invocable());

    let pin = descriptor.method("pin").context("pin 未生成")?;
    let capability = pin.params[0].capability.context("pin 缺少能力")?;
    assert_eq!(capability.kind, CapabilityKind::Concrete);
    assert!(!pin.params[0].is_injectable());

    let wire = descriptor.method("wire").context("wire 未生成")?;
    assert!(wire.params[0].binding.is_none());
    assert!(wire.params[1].capability.is_none());
    assert_eq!(wire.params[1].declared_type, "usize");
    Ok(())
}

#[test]
fn test_generated_descriptor_resolves() -> Result<()> {
    let interceptor = ExternInterceptor::new(Arc::new(registry()?));
    let mut service = ReportService::default();

    let err = interceptor.resolve(&mut service).unwrap_err();
    // 具名 "local" 不存在，必需字段未找到
    assert_eq!(err.member(), Some("local"));
    assert_eq!(service.storage.as_ref().map(|s| s.bucket()), Some("default"));
    assert_eq!(service.archive.as_ref().map(|s| s.bucket()), Some("archive"));
    assert!(service.mirror.is_none());
    Ok(())
}

#[test]
fn test_generated_methods_are_invoked_after_fields() -> Result<()> {
    let registry = ExternalRegistry::builder()
        .add(ExternalObject::new(LocalStorage("default")).provides::<dyn Storage>(|s| s))
        .add_named("local", ExternalObject::new(LocalStorage("local")))?
        .add_named(
            "archive",
            ExternalObject::new(LocalStorage("archive")).provides::<dyn Storage>(|s| s),
        )?
        .build();
    let interceptor = ExternInterceptor::new(Arc::new(registry));
    let mut service = ReportService::default();

    interceptor.resolve(&mut service)?;

    assert_eq!(service.local.as_ref().map(|s| s.bucket()), Some("local"));
    assert_eq!(service.buckets, vec!["archive".to_string()]);
    Ok(())
}
