use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stemplate::dictionary::Dictionary;
use stemplate::error::Error;
use stemplate::processor::Processor;
use stemplate::projector::{ProjectionMode, Projector, RenderOptions, SourceKind};
use stemplate::renderer::MiniJinjaRenderer;
use stemplate::value::Value;
use tempfile::TempDir;

fn dictionary() -> Arc<Dictionary> {
    Arc::new(
        [("name", Value::from("world")), ("ports", Value::text_list(["80", "443"]))]
            .into_iter()
            .collect(),
    )
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Prepares the mode the same way the binary does and runs the processor.
fn run(source: &str, output: Option<&Path>, options: RenderOptions) -> (Result<(), Error>, String) {
    let dictionary = dictionary();
    let engine = MiniJinjaRenderer::new(Arc::clone(&dictionary));
    let mode = ProjectionMode::prepare(SourceKind::classify(source), output).unwrap();
    let projector = Projector::new(mode, options);
    let processor = Processor::new(&engine, &dictionary, &projector);

    let mut stdout = Vec::new();
    let result = processor.run(source, &mut stdout);
    (result, String::from_utf8(stdout).unwrap())
}

#[test_log::test]
fn test_dir_to_dir() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    let expected = temp_dir.path().join("expected");

    write(&src.join("x.template"), "Hello {{ name }}!\n");
    write(&src.join("sub/y.template"), "{% for p in ports %}{{ p }};{% endfor %}");
    write(&src.join("sub/plain.txt"), "{{ name }} stays");
    write(&expected.join("x"), "Hello world!\n");
    write(&expected.join("sub/y"), "80;443;");
    write(&expected.join("sub/plain.txt"), "{{ name }} stays");

    let (result, stdout) = run(&src.display().to_string(), Some(out.as_path()), RenderOptions::default());

    result.unwrap();
    assert!(stdout.is_empty());
    assert!(out.join("sub").is_dir());
    assert!(!out.join("src").exists());
    assert!(!dir_diff::is_different(&out, &expected).unwrap());
}

#[test_log::test]
fn test_multi_to_dir_keeps_full_paths() {
    let temp_dir = TempDir::new().unwrap();
    let a = temp_dir.path().join("in/a.template");
    let b = temp_dir.path().join("in/dir/b.template");
    let out = temp_dir.path().join("out");
    write(&a, "a={{ name }}");
    write(&b, "b={{ name }}");

    let source = format!("{},{}", a.display(), b.display());
    let (result, _) = run(&source, Some(out.as_path()), RenderOptions::default());
    result.unwrap();

    let mirrored = |path: &Path| -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        out.join(relative).with_extension("")
    };
    assert_eq!(fs::read_to_string(mirrored(&a)).unwrap(), "a=world");
    assert_eq!(fs::read_to_string(mirrored(&b)).unwrap(), "b=world");
}

#[test]
fn test_file_to_file_into_existing_directory() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("a.txt.template");
    let out = temp_dir.path().join("out");
    write(&file, "{{ name }}");
    fs::create_dir(&out).unwrap();

    let (result, _) = run(&file.display().to_string(), Some(out.as_path()), RenderOptions::default());
    result.unwrap();

    assert_eq!(fs::read_to_string(out.join("a.txt")).unwrap(), "world");
}

#[test]
fn test_file_to_file_onto_new_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("page.html");
    let out = temp_dir.path().join("rendered.html");
    write(&file, "<p>{{ name }}</p>");

    let (result, _) = run(&file.display().to_string(), Some(out.as_path()), RenderOptions::default());
    result.unwrap();

    assert_eq!(fs::read_to_string(out).unwrap(), "<p>world</p>");
}

#[test]
fn test_stdout_renders_templates_and_copies_the_rest() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    write(&src.join("a.template"), "{{ name }}\n");
    write(&src.join("b.txt"), "{{ raw }}\n");

    let (result, stdout) = run(&src.display().to_string(), None, RenderOptions::default());
    result.unwrap();

    assert_eq!(stdout, "world\n{{ raw }}\n");
}

#[test]
fn test_stdout_single_file_is_always_rendered() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("b.txt");
    write(&file, "{{ name }}");

    let (result, stdout) = run(&file.display().to_string(), None, RenderOptions::default());
    result.unwrap();

    assert_eq!(stdout, "world");
}

#[test]
fn test_process_all() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    write(&src.join("b.txt"), "{{ name }}");

    let options = RenderOptions::new(".template", true);
    let (result, _) = run(&src.display().to_string(), Some(out.as_path()), options);
    result.unwrap();

    assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "world");
}

#[cfg(unix)]
#[test]
fn test_copy_keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    let script = src.join("run.sh");
    write(&script, "#!/bin/sh\necho {{ name }}\n");
    fs::set_permissions(&script, fs::Permissions::from_mode(0o750)).unwrap();

    let (result, _) = run(&src.display().to_string(), Some(out.as_path()), RenderOptions::default());
    result.unwrap();

    let copied = out.join("run.sh");
    assert_eq!(fs::read(&copied).unwrap(), fs::read(&script).unwrap());
    assert_eq!(fs::metadata(&copied).unwrap().permissions().mode() & 0o777, 0o750);
}

#[cfg(unix)]
#[test]
fn test_created_directories_keep_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out");
    let sub = src.join("private");
    write(&sub.join("a.template"), "{{ name }}");
    fs::set_permissions(&sub, fs::Permissions::from_mode(0o700)).unwrap();

    let (result, _) = run(&src.display().to_string(), Some(out.as_path()), RenderOptions::default());
    result.unwrap();

    let created = out.join("private");
    assert_eq!(fs::metadata(&created).unwrap().permissions().mode() & 0o777, 0o700);
    assert_eq!(fs::read_to_string(created.join("a")).unwrap(), "world");
}

#[test]
fn test_directory_onto_existing_file_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let src = temp_dir.path().join("src");
    let out = temp_dir.path().join("out.txt");
    fs::create_dir(&src).unwrap();
    write(&out, "keep");

    let result = ProjectionMode::prepare(SourceKind::Directory, Some(out.as_path()));

    assert!(matches!(result, Err(Error::DestinationConflict { .. })));
    assert_eq!(fs::read_to_string(out).unwrap(), "keep");
}

#[test_log::test]
fn test_failure_stops_the_walk_without_rollback() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("in/first.template");
    let second = temp_dir.path().join("in/second.template");
    let third = temp_dir.path().join("in/third.template");
    let out = temp_dir.path().join("out");
    write(&first, "{{ name }}");
    write(&second, "{{ left(name, 99) }}");
    write(&third, "{{ name }}");

    let source = [&first, &second, &third]
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(",");
    let (result, _) = run(&source, Some(out.as_path()), RenderOptions::default());

    let err = result.unwrap_err();
    assert!(err.to_string().contains("Index out of range"));

    let mirrored = out.join(temp_dir.path().strip_prefix("/").unwrap()).join("in");
    assert_eq!(fs::read_to_string(mirrored.join("first")).unwrap(), "world");
    assert!(!mirrored.join("third").exists());
}

#[test]
fn test_missing_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.template");

    let (result, _) = run(&missing.display().to_string(), None, RenderOptions::default());

    assert!(matches!(result, Err(Error::WalkError(_))));
}
