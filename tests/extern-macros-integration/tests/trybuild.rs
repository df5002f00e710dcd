//! trybuild compile-time tests for extern_macros

#[test]
fn trybuild_extern_macros() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/external_target_ok.rs");
    t.pass("tests/trybuild/extern_methods_ok.rs");
}
