//! Loads the built hello-screen library through the host's dynamic loader.

#![cfg(unix)]

use std::{
    env::consts::{DLL_EXTENSION, DLL_PREFIX},
    path::PathBuf,
};

use spider_core::extension::ExtensionRegistry;
use spider_screen::{Action, EventResult, Input, Screen, ScreenContext, Settings};

/// The cdylib cargo builds alongside this test binary.
fn built_library() -> PathBuf {
    let file = format!("{DLL_PREFIX}hello_screen.{DLL_EXTENSION}");
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();

    [deps.join(&file), deps.parent().unwrap().join(&file)]
        .into_iter()
        .find(|path| path.is_file())
        .unwrap_or_else(|| panic!("{file} not found next to {}", deps.display()))
}

#[test]
fn test_registry_loads_and_drives_built_module() {
    let plugins = tempfile::tempdir().unwrap();
    std::fs::copy(built_library(), plugins.path().join(format!("hello.{DLL_EXTENSION}"))).unwrap();

    let mut registry = ExtensionRegistry::load_all(plugins.path());
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["hello"]);
    assert_eq!(registry.get("hello").map(|screen| screen.name()), Some("hello"));

    let mut ctx = ScreenContext::new(Settings::default(), plugins.path().to_path_buf());
    let mut first = registry.open("hello").unwrap();
    first.on_activate();
    assert_eq!(first.update(&Input::char('x'), &mut ctx), EventResult::Consumed);
    assert_eq!(first.update(&Input::Tick, &mut ctx), EventResult::Ignored);
    assert_eq!(first.update(&Input::char('q'), &mut ctx), EventResult::Consumed);
    assert!(matches!(ctx.take_actions().as_slice(), [Action::Pop]));
    first.on_deactivate();
    drop(first);

    let second = registry.open("hello").unwrap();
    assert_eq!(second.name(), "hello");
    drop(second);
    drop(registry);
}
