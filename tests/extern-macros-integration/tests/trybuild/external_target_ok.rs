use extern_abstractions::ExternalTarget;
use extern_macros::ExternalTarget;
use std::sync::Arc;

pub trait Clock: Send + Sync {}

pub struct Wall;

#[derive(ExternalTarget)]
struct Base {
    #[external("clock")]
    clock: Option<Arc<dyn Clock>>,
}

#[derive(ExternalTarget)]
struct Job {
    #[extern_parent]
    base: Base,
    #[external]
    backup: Option<Arc<dyn Clock>>,
    #[external(name = "wall", optional)]
    wall: Option<Arc<Wall>>,
    #[external(value = "kind")]
    r#type: Option<Arc<dyn Clock>>,
    retries: u32,
}

#[derive(ExternalTarget)]
struct Marker;

fn main() {
    let descriptor = Job::type_descriptor();
    let names: Vec<_> = descriptor.fields().iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["backup", "wall", "type"]);
    assert!(descriptor.superclass().is_some());
    assert_eq!(Marker::type_descriptor().fields().len(), 0);

    let _ = Job {
        base: Base { clock: None },
        backup: None,
        wall: None,
        r#type: None,
        retries: 0,
    }
    .retries;
}
