//! Plugin scenarios
//!
//! Each section follows one way plugins use the access layer: resolving
//! their own installation folder, reaching into another plugin, editing user
//! content, and describing layered sources in a sources file.

use cpf_repository::{
    AccessRegistry, BuildContext, ContainedAccess, ContentAccessFactory, Error, FileAccess,
    GenericFileFilter, ListOptions, LocalContentAccessFactory, PathBasedAccess, ReadAccess,
    ReadWriteAccess, RootedResolver, SourceConfig, SourcesConfig, SystemDirLocator, TextEncoding,
};
use cpf_test_utils::TestSolution;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn solution() -> TestSolution {
    TestSolution::new()
        .with_plugin("cde")
        .with_plugin("cdf")
        .with_file("system/cde/static/js/editor.js", "editor")
        .with_file("system/cde/resources/base/template.html", "<html/>")
        .with_file("system/cdf/js/cdf.js", "cdf")
        .with_file("system/passwords.txt", "hunter2")
        .with_file("repository/etc/mondrian/schema.xml", "<Schema/>")
        .with_file("repository/home/admin/sales.wcdf", "<cdf/>")
}

// =============================================================================
// Own installation folder
// =============================================================================

#[test]
fn both_path_conventions_reach_the_same_file() {
    let solution = solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let system = factory.plugin_system_reader("").unwrap();

    assert_eq!(system.read_text("/static/js/editor.js").unwrap(), "editor");
    assert_eq!(
        system.read_text("/system/cde/static/js/editor.js").unwrap(),
        "editor"
    );
}

#[test]
fn narrowed_base_path_is_the_new_boundary() {
    let solution = solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let resources = factory.plugin_system_reader("resources").unwrap();

    assert_eq!(resources.read_text("/base/template.html").unwrap(), "<html/>");
    assert!(!resources.exists("/../static/js/editor.js"));
    assert!(resources.exists(""));
}

#[test]
fn traversal_out_of_the_plugin_reports_not_found() {
    let solution = solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let system = factory.plugin_system_writer("").unwrap();

    for escaping in [
        "/../passwords.txt",
        "../cdf/js/cdf.js",
        "/static/../../passwords.txt",
        "/system/cdf/js/cdf.js",
    ] {
        assert!(!system.exists(escaping), "{escaping} should not exist");
        assert!(system.read(escaping).is_none(), "{escaping} should not read");
        assert!(system.fetch_file(escaping).is_none());
        assert_eq!(system.last_modified(escaping), 0);
    }

    assert!(!system.save_text("/../passwords.txt", "changed"));
    assert!(!system.delete_file("/../passwords.txt"));
    solution.assert_file_contains("system/passwords.txt", "hunter2");
}

#[test]
fn system_writer_edits_stay_inside() {
    let solution = solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let system = factory.plugin_system_writer("").unwrap();

    assert!(system.save_text("/system/cde/static/css/new.css", "css"));
    solution.assert_file_contains("system/cde/static/css/new.css", "css");
    assert!(system.create_folder("/cache", false));
    solution.assert_file_exists("system/cde/cache");
}

// =============================================================================
// Another plugin's folder
// =============================================================================

#[test]
fn other_plugins_are_reached_through_the_factory() {
    let solution = solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();

    let cdf = factory.other_plugin_system_reader("cdf", "js").unwrap();
    assert_eq!(cdf.read_text("/cdf.js").unwrap(), "cdf");
    // Below the plugin root the alias is no longer recognised.
    assert!(cdf.read_text("/system/cdf/js/cdf.js").is_none());
    let root = factory.other_plugin_system_reader("cdf", "").unwrap();
    assert_eq!(root.read_text("/system/cdf/js/cdf.js").unwrap(), "cdf");

    let missing = factory.other_plugin_system_reader("cda", "");
    assert!(matches!(missing.map(|_| ()), Err(Error::UnknownPlugin { .. })));

    let sneaky = factory.other_plugin_system_reader("../system", "");
    assert!(sneaky.is_err());
}

#[test]
fn locator_builds_contained_accesses_directly() {
    let solution = solution();
    let locator = SystemDirLocator::new(solution.system_dir());
    let access = ContainedAccess::for_plugin(&locator, "cdf", None).unwrap();

    let js = access.list_files("/", &GenericFileFilter::with_extensions(["js"]), ListOptions::default());
    let paths: Vec<&str> = js.iter().map(|f| f.path()).collect();
    assert_eq!(paths, vec!["/js/cdf.js"]);
}

// =============================================================================
// User content
// =============================================================================

#[test]
fn user_content_honours_permissions() {
    let solution = solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let user = factory.user_content_access("/").unwrap();

    assert!(user.has_access("/home/admin/sales.wcdf", FileAccess::Read));
    assert!(user.has_access("/home/admin/sales.wcdf", FileAccess::Write));
    assert!(!user.has_access("/home/admin/none.wcdf", FileAccess::Execute));

    assert!(!user.has_access("/etc/mondrian/schema.xml", FileAccess::Delete));
    assert!(!user.delete_file("/etc/mondrian/schema.xml"));
    solution.assert_file_exists("repository/etc/mondrian/schema.xml");

    assert!(user.copy_file("/home/admin/sales.wcdf", "/home/admin/sales-copy.wcdf"));
    solution.assert_file_contains("repository/home/admin/sales-copy.wcdf", "<cdf/>");
}

#[test]
fn repository_and_user_handles_stay_in_scope() {
    let solution = solution().with_file("outside.txt", "untouched");
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();
    let user = factory.user_content_access("/").unwrap();
    let repository = factory.plugin_repository_writer("").unwrap();

    assert!(!user.has_access("/home/../etc/mondrian/schema.xml", FileAccess::Write));
    assert!(!user.save_text("/home/../etc/mondrian/schema.xml", "<Broken/>"));
    assert!(!user.save_text("../system/cde/plugin.xml", "<replaced/>"));
    assert!(!repository.save_text("../../../outside.txt", "changed"));
    assert!(repository
        .read_text("../../../system/cde/static/js/editor.js")
        .is_none());

    solution.assert_file_contains("repository/etc/mondrian/schema.xml", "<Schema/>");
    solution.assert_file_not_exists("system/cde/plugin.xml");
    solution.assert_file_contains("outside.txt", "untouched");
}

#[test]
fn base_paths_leading_out_of_scope_are_refused() {
    let solution = solution();
    let factory = LocalContentAccessFactory::new(solution.root(), "cde").unwrap();

    let err = factory.plugin_system_reader("../cdf").map(|_| ()).unwrap_err();
    assert!(err.is_configuration_fault());
    assert!(factory.plugin_system_writer("../..").is_err());
    assert!(factory.plugin_repository_reader("../cdf").is_err());
    assert!(factory.user_content_access("../system").is_err());
    solution.assert_file_contains("system/passwords.txt", "hunter2");
}

// =============================================================================
// Sources files and the registry
// =============================================================================

#[test]
fn sources_file_describes_a_layered_view() {
    let solution = solution()
        .with_file("overrides/static/js/editor.js", "patched editor")
        .with_file(
            "sources.toml",
            r#"
base_path = "/static"

[[source]]
kind = "filesystem"
root = "overrides"

[[source]]
kind = "contained"
plugin_dir = "system/cde"
"#,
        );

    let config = SourcesConfig::load(&solution.root().join("sources.toml")).unwrap();
    let composite = config.build(&AccessRegistry::with_builtins()).unwrap();

    assert_eq!(composite.sources().len(), 2);
    assert_eq!(composite.read_text("/js/editor.js").unwrap(), "patched editor");
    assert!(!composite.exists("/../../passwords.txt"));
}

#[test]
fn sources_file_round_trips_through_save() {
    let solution = solution();
    let config = SourcesConfig {
        base_path: Some("/".to_string()),
        encoding: TextEncoding::Latin1,
        sources: vec![SourceConfig {
            kind: AccessRegistry::CONTAINED.to_string(),
            root: None,
            plugin_dir: Some("system/cdf".into()),
            base_path: Some("js".to_string()),
            hide_dot_entries: false,
        }],
        config_dir: solution.root().to_path_buf(),
    };
    let path = solution.root().join("saved-sources.toml");
    config.save(&path).unwrap();

    let reloaded = SourcesConfig::load(&path).unwrap();
    assert_eq!(reloaded, config);
    let composite = reloaded.build(&AccessRegistry::with_builtins()).unwrap();
    assert_eq!(composite.read_text("/cdf.js").unwrap(), "cdf");
}

#[test]
fn custom_kinds_plug_into_the_registry() {
    fn hidden_aware(
        source: &SourceConfig,
        context: &BuildContext,
    ) -> cpf_repository::Result<Arc<dyn ReadWriteAccess>> {
        let root = source
            .root
            .clone()
            .ok_or_else(|| Error::configuration("hidden-aware source needs a root"))?;
        let resolver = RootedResolver::new(context.config_dir.join(root)).hiding_dot_entries();
        Ok(Arc::new(PathBasedAccess::new(resolver)))
    }

    let solution = solution()
        .with_file("content/visible.txt", "v")
        .with_file("content/.secret/hidden.txt", "h")
        .with_file("sources.toml", "[[source]]\nkind = \"hidden-aware\"\nroot = \"content\"\n");

    let mut registry = AccessRegistry::with_builtins();
    registry.register("hidden-aware", hidden_aware);

    let config = SourcesConfig::load(&solution.root().join("sources.toml")).unwrap();
    let composite = config.build(&registry).unwrap();
    let listed = composite.list_files("/", &cpf_repository::AcceptAll, ListOptions::default());
    let names: Vec<&str> = listed.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["visible.txt"]);

    let unknown = SourcesConfig::from_toml_str("[[source]]\nkind = \"hidden-aware\"\nroot = \"content\"\n", solution.root())
        .unwrap()
        .build(&AccessRegistry::with_builtins());
    assert!(matches!(unknown.map(|_| ()), Err(Error::UnknownAccessKind { .. })));
}
