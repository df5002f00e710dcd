use extern_abstractions::{ExternMethods, ExternalTarget};
use extern_macros::{extern_methods, ExternalTarget};
use std::sync::Arc;

pub trait Sink: Send + Sync {}

#[derive(Default, ExternalTarget)]
#[extern_target(methods)]
struct Pipeline {
    sinks: usize,
}

#[extern_methods]
impl Pipeline {
    pub fn attach(&mut self, #[external] _sink: Arc<dyn Sink>) {
        self.sinks += 1;
    }

    pub fn try_attach(
        &mut self,
        #[external(name = "audit", optional)] sink: Option<Arc<dyn Sink>>,
    ) -> Result<(), String> {
        self.sinks += usize::from(sink.is_some());
        Ok(())
    }

    pub fn sinks(&self) -> usize {
        self.sinks
    }

    pub fn build() -> Self {
        Self::default()
    }

    pub fn consume(self) {}

    pub fn generic<T: Default>(&mut self) -> T {
        T::default()
    }
}

fn main() {
    let methods = <Pipeline as ExternMethods>::extern_methods();
    let names: Vec<_> = methods.iter().map(|m| m.name).collect();
    assert_eq!(names, vec!["attach", "try_attach", "sinks", "build"]);
    assert_eq!(Pipeline::type_descriptor().methods().len(), 4);

    let mut pipeline = Pipeline::build();
    pipeline.attach(Arc::new(NullSink));
    let _: u8 = pipeline.generic();
    assert_eq!(pipeline.sinks(), 1);
    pipeline.consume();
}

struct NullSink;

impl Sink for NullSink {}
