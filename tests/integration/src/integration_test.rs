//! End-to-end integration test for the vertical slice
//!
//! This test exercises the complete flow: factory -> layered composite ->
//! settings cascade -> writes observed through the composite.

use cpf_repository::settings::SETTINGS_FILE;
use cpf_repository::{
    AcceptAll, CompositeReadAccess, ContentAccessFactory, EmbeddedAccess, ListOptions,
    LocalContentAccessFactory, ReadAccess, Settings,
};
use cpf_test_utils::TestSolution;
use pretty_assertions::assert_eq;
use std::sync::Arc;

/// A solution with the `cde` plugin installed and some repository content.
fn setup_test_solution() -> TestSolution {
    TestSolution::new()
        .with_plugin("cde")
        .with_plugin("cdf")
        .with_file("system/cde/settings.toml", "[cache]\nenabled = true\nsize = 50\n")
        .with_file("system/cde/resources/styles/base.css", "base from system")
        .with_file("system/cde/resources/styles/theme.css", "theme from system")
        .with_file("system/cdf/js/cdf.js", "cdf")
        .with_file(
            "repository/public/cde/resources/styles/theme.css",
            "theme from repository",
        )
        .with_file("repository/public/cde/settings.toml", "[cache]\nsize = 500\n")
}

fn bundled_defaults() -> EmbeddedAccess {
    EmbeddedAccess::from_static(
        "cde-defaults",
        &[
            (SETTINGS_FILE, &b"timeout = 30\n[cache]\nenabled = false\n"[..]),
            ("resources/styles/print.css", &b"print from bundle"[..]),
        ],
    )
}

fn layered_resources(factory: &LocalContentAccessFactory) -> CompositeReadAccess {
    let sources: Vec<Arc<dyn ReadAccess>> = vec![
        factory.plugin_repository_reader("").unwrap(),
        factory.plugin_system_reader("").unwrap(),
        Arc::new(bundled_defaults()),
    ];
    CompositeReadAccess::new(sources, Some("/resources"))
}

#[test]
fn test_factory_refuses_unknown_plugins() {
    let solution = setup_test_solution();
    let err = LocalContentAccessFactory::new(solution.root(), "ghost").unwrap_err();
    assert!(err.is_configuration_fault());
}

#[test]
fn test_layered_resources_resolve_first_match() {
    let solution = setup_test_solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let resources = layered_resources(&factory);

    assert_eq!(
        resources.read_text("/styles/theme.css").unwrap(),
        "theme from repository"
    );
    assert_eq!(
        resources.read_text("/styles/base.css").unwrap(),
        "base from system"
    );
    assert_eq!(
        resources.read_text("/styles/print.css").unwrap(),
        "print from bundle"
    );
    assert!(resources.read("/styles/missing.css").is_none());
}

#[test]
fn test_listing_comes_from_the_owning_source_only() {
    let solution = setup_test_solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let resources = layered_resources(&factory);

    let mut names: Vec<String> = resources
        .list_files("/styles", &AcceptAll, ListOptions::default())
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    names.sort();

    assert_eq!(names, vec!["theme.css"]);
}

#[test]
fn test_settings_cascade_across_sources() {
    let solution = setup_test_solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();

    let bundled = bundled_defaults();
    let system = factory.plugin_system_reader("").unwrap();
    let repository = factory.plugin_repository_reader("").unwrap();
    let settings = Settings::load(&[
        (&bundled as &dyn ReadAccess, SETTINGS_FILE),
        (system.as_ref(), SETTINGS_FILE),
        (repository.as_ref(), SETTINGS_FILE),
    ]);

    assert!(settings.get_bool("cache.enabled", false));
    assert_eq!(settings.get_int("cache.size", 0), 500);
    assert_eq!(settings.get_long("timeout", 0), 30);
    assert_eq!(settings.get_int("missing", 7), 7);
}

#[test]
fn test_full_vertical_slice() {
    let solution = setup_test_solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();

    // 1. Base css comes from the system folder
    let resources = layered_resources(&factory);
    assert_eq!(
        resources.read_text("/styles/base.css").unwrap(),
        "base from system"
    );

    // 2. Override it in the plugin repository folder
    let writer = factory.plugin_repository_writer("resources").unwrap();
    assert!(writer.save_text("/styles/base.css", "base from repository"));
    solution.assert_file_contains(
        "repository/public/cde/resources/styles/base.css",
        "base from repository",
    );

    // 3. The composite now resolves the override
    assert_eq!(
        resources.read_text("/styles/base.css").unwrap(),
        "base from repository"
    );

    // 4. Deleting the override falls back to the system copy
    assert!(writer.delete_file("/styles/base.css"));
    assert_eq!(
        resources.read_text("/styles/base.css").unwrap(),
        "base from system"
    );
    solution.assert_file_contains("system/cde/resources/styles/base.css", "base from system");
}
