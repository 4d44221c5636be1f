use nsregistry::core::path::normalize_lexically;
use nsregistry::{
    CachingLoader, HostLoader, NamespaceError, NamespaceRegistry, NodeId, RegistryConfig,
    SourceLoader, declared_location, path_loader,
};
use std::cell::RefCell;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_module(root: &Path, rel: &str, body: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("module parent")).expect("create module dir");
    fs::write(&path, body).expect("write module");
    path
}

fn registry_in(root: &Path) -> NamespaceRegistry {
    NamespaceRegistry::with_config(RegistryConfig::default().with_base_dir(root))
        .expect("registry config")
}

#[test]
fn define_then_use_returns_identical_nodes() {
    let mut registry = NamespaceRegistry::new();
    let c = registry.define("A\\B\\C").expect("define");
    assert_eq!(registry.define("A\\B\\C").expect("define again"), c);

    let b = registry.use_namespace("A\\B").expect("use A\\B");
    let a = registry.use_namespace("A").expect("use A");
    assert_eq!(registry.use_namespace("A\\B\\C").expect("use full"), c);
    assert_eq!(registry.parent(c), Some(b));
    assert_eq!(registry.parent(b), Some(a));
    assert_eq!(registry.parent(a), Some(NodeId::ROOT));
    assert_eq!(registry.name(b), Some("B"));
    assert_eq!(registry.qualified_name(c), "A\\B\\C");
}

#[test]
fn define_extends_existing_chain() {
    let mut registry = NamespaceRegistry::new();
    let b = registry.define("A\\B").expect("define");
    let d = registry.define("A\\B\\D").expect("define deeper");
    assert_eq!(registry.parent(d), Some(b));
    assert_eq!(registry.len(), 4);
}

#[test]
fn use_never_creates_nodes() {
    let mut registry = NamespaceRegistry::new();
    registry.define("App").expect("define");
    let before = registry.len();
    let err = registry.use_namespace("App\\Missing\\Deep").unwrap_err();
    assert!(matches!(err, NamespaceError::NotFound(_)));
    assert_eq!(registry.len(), before);
    assert!(registry.use_namespace("Other").unwrap_err().is_not_found());
}

#[test]
fn invalid_paths_are_rejected() {
    let mut registry = NamespaceRegistry::new();
    for bad in ["", "A\\\\B", "\\A", "A\\"] {
        assert!(
            registry.define(bad).unwrap_err().is_invalid_argument(),
            "define({bad:?}) should be rejected"
        );
        assert!(
            registry.use_namespace(bad).unwrap_err().is_invalid_argument(),
            "use({bad:?}) should be rejected"
        );
    }
    assert!(registry.is_empty());
}

#[test]
fn siblings_are_independent() {
    let mut registry = NamespaceRegistry::new();
    let root = registry.root();
    let models = registry.add_child(root, "Models").expect("add Models");
    let views = registry.add_child(root, "Views").expect("add Views");
    registry.add_class(models, "User", "models/user").expect("class");

    assert_eq!(registry.get_child(root, "Models"), Some(models));
    assert_eq!(registry.get_child(root, "Views"), Some(views));
    assert_eq!(registry.get_child(root, "Controllers"), None);
    assert!(registry.get_class(views, "User").is_none());
    assert_eq!(registry.children(root), &[models, views]);
}

#[test]
fn class_declarations_are_idempotent() {
    let mut registry = NamespaceRegistry::new();
    let ns = registry.define("Shop").expect("define");
    registry
        .add_class(ns, "Cart", "shop/cart.js")
        .and_then(|id| registry.add_class(id, "Cart", "shop/other.js"))
        .expect("add classes");
    assert_eq!(registry.classes(ns).len(), 1);
    assert_eq!(
        registry.get_class(ns, "Cart").map(|c| c.location.as_str()),
        Some("shop/cart.js")
    );
    assert!(registry.get_class(ns, "Checkout").is_none());
}

#[test]
fn default_require_loads_from_working_directory() {
    let mut registry = NamespaceRegistry::new();
    let ns = registry.define("Foo\\Bar").expect("define");
    let seen = RefCell::new(Vec::new());
    let host = |path: &Path| -> anyhow::Result<()> {
        seen.borrow_mut().push(path.to_path_buf());
        Ok(())
    };
    registry.require(ns, "Baz", &host).expect("require");

    let expected = env::current_dir()
        .expect("cwd")
        .join("Foo")
        .join("Bar")
        .join("Baz.js");
    assert_eq!(seen.borrow().as_slice(), &[normalize_lexically(&expected)]);
}

#[test]
fn require_reads_module_from_base_dir() {
    let tmp = tempdir().expect("tempdir");
    write_module(tmp.path(), "Vendor/Http/Client.js", "export client");

    let mut registry = registry_in(tmp.path());
    registry.define("Vendor\\Http").expect("define");
    let http = registry.use_namespace("Vendor\\Http").expect("use");
    let source = registry
        .require(http, "Client", &SourceLoader::new())
        .expect("require Client");
    assert_eq!(source, "export client");
}

#[test]
fn require_is_not_cached_by_registry() {
    let tmp = tempdir().expect("tempdir");
    let path = write_module(tmp.path(), "App/Config.js", "v1");

    let mut registry = registry_in(tmp.path());
    let app = registry.define("App").expect("define");
    let host = SourceLoader::new();
    assert_eq!(registry.require(app, "Config", &host).expect("first"), "v1");
    fs::write(&path, "v2").expect("rewrite module");
    assert_eq!(registry.require(app, "Config", &host).expect("second"), "v2");

    let cached = CachingLoader::new(SourceLoader::new());
    assert_eq!(registry.require(app, "Config", &cached).expect("cached"), "v2");
    fs::write(&path, "v3").expect("rewrite module");
    assert_eq!(registry.require(app, "Config", &cached).expect("cached again"), "v2");
}

#[test]
fn missing_module_error_passes_through() {
    let tmp = tempdir().expect("tempdir");
    let mut registry = registry_in(tmp.path());
    let ns = registry.define("Ghost").expect("define");
    let err = registry
        .require(ns, "Nope", &SourceLoader::new())
        .unwrap_err();
    match err {
        NamespaceError::Loader(inner) => {
            let io = inner
                .downcast_ref::<std::io::Error>()
                .expect("io error underneath");
            assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
            assert!(inner.to_string().contains("Nope.js"));
        }
        other => panic!("expected loader error, got {other:?}"),
    }
}

#[test]
fn custom_loader_bypasses_default_convention() {
    let tmp = tempdir().expect("tempdir");
    let target = write_module(tmp.path(), "elsewhere/x_impl.js", "custom");

    let mut registry = registry_in(tmp.path());
    let ns = registry.define("Lib\\Ext").expect("define");
    let calls = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorded = calls.clone();
    let target_for_loader = target.clone();
    registry
        .set_node_loader(
            ns,
            path_loader(move |node, class| {
                recorded
                    .lock()
                    .expect("calls lock")
                    .push((node.qualified_name(), class.to_string()));
                Ok(target_for_loader.clone())
            }),
        )
        .expect("set loader");

    let seen = RefCell::new(None);
    let host = |path: &Path| -> anyhow::Result<String> {
        *seen.borrow_mut() = Some(path.to_path_buf());
        SourceLoader::new().load(path)
    };
    assert_eq!(registry.require(ns, "X", &host).expect("require"), "custom");
    assert_eq!(seen.borrow().as_deref(), Some(target.as_path()));
    assert_eq!(
        calls.lock().expect("calls lock").as_slice(),
        &[("Lib\\Ext".to_string(), "X".to_string())]
    );
}

#[test]
fn registry_loader_applies_to_descendants() {
    let tmp = tempdir().expect("tempdir");
    let mut registry = registry_in(tmp.path());
    let leaf = registry.define("Deep\\Tree\\Leaf").expect("define");
    registry.set_loader(path_loader(|node, class| {
        Ok(PathBuf::from("/plugins").join(node.segments().join("_")).join(class))
    }));
    assert_eq!(
        registry.resolve(leaf, "Item").expect("resolve"),
        PathBuf::from("/plugins/Deep_Tree_Leaf/Item")
    );

    // A closer loader wins over the root's.
    let tree = registry.use_namespace("Deep\\Tree").expect("use");
    registry
        .set_node_loader(tree, path_loader(|_, class| Ok(PathBuf::from(format!("/tree/{class}")))))
        .expect("set loader");
    assert_eq!(
        registry.resolve(leaf, "Item").expect("resolve"),
        PathBuf::from("/tree/Item")
    );

    registry.clear_node_loader(tree).expect("clear loader");
    registry.clear_node_loader(registry.root()).expect("clear root loader");
    assert_eq!(
        registry.resolve(leaf, "Item").expect("resolve"),
        tmp.path().join("Deep/Tree/Leaf/Item.js")
    );
}

#[test]
fn declared_locations_drive_resolution() {
    let tmp = tempdir().expect("tempdir");
    write_module(tmp.path(), "src/net/client.js", "declared");
    write_module(tmp.path(), "Net/Server.js", "conventional");

    let mut registry = registry_in(tmp.path());
    let net = registry.define("Net").expect("define");
    registry
        .add_class(net, "Client", "src/net/client.js")
        .expect("declare");
    registry.set_loader(declared_location());

    let host = SourceLoader::new();
    assert_eq!(registry.require(net, "Client", &host).expect("Client"), "declared");
    assert_eq!(registry.require(net, "Server", &host).expect("Server"), "conventional");
}

#[test]
fn loader_sees_node_context() {
    let mut registry = NamespaceRegistry::new();
    let ns = registry.define("Outer\\Inner").expect("define");
    registry.add_class(ns, "Known", "k.js").expect("declare");
    registry
        .set_node_loader(
            ns,
            path_loader(|node, class| {
                let parent = node.parent().map(|p| p.name().to_string()).unwrap_or_default();
                let declared = node.get_class(class).is_some();
                Ok(PathBuf::from(format!("/{parent}/{}/{class}/{declared}", node.name())))
            }),
        )
        .expect("set loader");
    assert_eq!(
        registry.resolve(ns, "Known").expect("resolve"),
        PathBuf::from("/Outer/Inner/Known/true")
    );
    assert_eq!(
        registry.resolve(ns, "Other").expect("resolve"),
        PathBuf::from("/Outer/Inner/Other/false")
    );
}

#[test]
fn stale_ids_after_reset_are_not_found() {
    let mut registry = NamespaceRegistry::new();
    let ns = registry.define("Temp\\Node").expect("define");
    registry.reset();
    assert!(registry.add_class(ns, "X", "x").unwrap_err().is_not_found());
    assert!(registry.resolve(ns, "X").unwrap_err().is_not_found());
    assert_eq!(registry.get_child(registry.root(), "Temp"), None);
}
