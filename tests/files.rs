use std::fs;
use std::path::Path;

use deminify_html::files::{
    collect_html_files, deminify_directory, deminify_file, find_formatted_files,
    promote_formatted, Promotion,
};
use deminify_html::{Error, Options};
use tempfile::tempdir;

const MINIFIED: &str = "<div><p>Hi</p></div>";
const FORMATTED: &str = "<div>\n  <p>\n    Hi\n  </p>\n</div>";

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

#[test]
fn single_file_goes_to_formatted_sibling() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("index.html");
    write(&input, MINIFIED);

    let out = deminify_file(&input, None, &Options::default()).unwrap();

    assert_eq!(out, dir.path().join("index_formatted.html"));
    assert_eq!(fs::read_to_string(&out).unwrap(), FORMATTED);
    assert_eq!(fs::read_to_string(&input).unwrap(), MINIFIED);
}

#[test]
fn single_file_to_explicit_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("a.html");
    let output = dir.path().join("pretty.html");
    write(&input, MINIFIED);

    let opts = Options {
        indent_width: 4,
        ..Options::default()
    };
    let out = deminify_file(&input, Some(&output), &opts).unwrap();

    assert_eq!(out, output);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "<div>\n    <p>\n        Hi\n    </p>\n</div>"
    );
}

#[test]
fn missing_input_is_a_read_error() {
    let dir = tempdir().unwrap();
    let err = deminify_file(&dir.path().join("nope.html"), None, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
    assert!(err.to_string().contains("nope.html"));
}

#[test]
fn invalid_utf8_is_a_decode_error() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.html");
    fs::write(&input, [0x3c, 0x70, 0x3e, 0xff, 0xfe]).unwrap();
    let err = deminify_file(&input, None, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn collects_html_files_sorted_and_skips_outputs() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("b.html"), MINIFIED);
    write(&root.join("a.HTM"), MINIFIED);
    write(&root.join("a_formatted.html"), FORMATTED);
    write(&root.join("style.css"), "a{}");
    write(&root.join("sub/c.html"), MINIFIED);

    let flat = collect_html_files(root, false).unwrap();
    assert_eq!(flat, vec![root.join("a.HTM"), root.join("b.html")]);

    let deep = collect_html_files(root, true).unwrap();
    assert_eq!(
        deep,
        vec![root.join("a.HTM"), root.join("b.html"), root.join("sub/c.html")]
    );
}

#[test]
fn missing_directory_and_file_path_are_rejected() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    assert!(matches!(
        collect_html_files(&missing, false),
        Err(Error::MissingDirectory(_))
    ));

    let file = dir.path().join("x.html");
    write(&file, MINIFIED);
    assert!(matches!(
        deminify_directory(&file, false, &Options::default()),
        Err(Error::NotADirectory(_))
    ));
}

#[test]
fn batch_formats_every_file_and_keeps_going_after_failures() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("one.html"), MINIFIED);
    fs::write(root.join("broken.html"), [0xff, 0xfe, 0xfd]).unwrap();
    write(&root.join("nested/two.html"), "<ul><li>x</li></ul>");

    let report = deminify_directory(root, true, &Options::default()).unwrap();

    assert_eq!(report.total(), 3);
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(!report.is_success());
    assert_eq!(report.failed[0].path, root.join("broken.html"));
    assert!(matches!(report.failed[0].error, Error::Decode { .. }));

    assert_eq!(
        fs::read_to_string(root.join("one_formatted.html")).unwrap(),
        FORMATTED
    );
    assert_eq!(
        fs::read_to_string(root.join("nested/two_formatted.html")).unwrap(),
        "<ul>\n  <li>\n    x\n  </li>\n</ul>"
    );
}

#[test]
fn batch_on_empty_directory_succeeds() {
    let dir = tempdir().unwrap();
    let report = deminify_directory(dir.path(), false, &Options::default()).unwrap();
    assert_eq!(report.total(), 0);
    assert!(report.is_success());
}

#[test]
fn finds_formatted_files_recursively() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("index_formatted.html"), FORMATTED);
    write(&root.join("index.html"), MINIFIED);
    write(&root.join("zh/about_formatted.htm"), FORMATTED);
    write(&root.join("notes_formatted.txt"), "x");

    let found = find_formatted_files(root).unwrap();
    assert_eq!(
        found,
        vec![
            Promotion {
                formatted: root.join("index_formatted.html"),
                original: root.join("index.html"),
            },
            Promotion {
                formatted: root.join("zh/about_formatted.htm"),
                original: root.join("zh/about.htm"),
            },
        ]
    );
}

#[test]
fn promote_replaces_and_creates_originals() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("index.html"), MINIFIED);
    write(&root.join("index_formatted.html"), FORMATTED);
    write(&root.join("sub/new_formatted.html"), "<p>\n  n\n</p>");

    let report = promote_formatted(root, false).unwrap();

    assert!(report.is_success());
    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(fs::read_to_string(root.join("index.html")).unwrap(), FORMATTED);
    assert!(!root.join("index_formatted.html").exists());
    assert_eq!(
        fs::read_to_string(root.join("sub/new.html")).unwrap(),
        "<p>\n  n\n</p>"
    );
    assert!(!root.join("sub/new_formatted.html").exists());
}

#[test]
fn promote_dry_run_touches_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("index.html"), MINIFIED);
    write(&root.join("index_formatted.html"), FORMATTED);

    let report = promote_formatted(root, true).unwrap();

    assert_eq!(report.succeeded, vec![root.join("index.html")]);
    assert_eq!(fs::read_to_string(root.join("index.html")).unwrap(), MINIFIED);
    assert!(root.join("index_formatted.html").exists());
}

#[test]
fn format_then_promote_round_trip() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("page.html"), MINIFIED);

    deminify_directory(root, false, &Options::default()).unwrap();
    promote_formatted(root, false).unwrap();

    assert_eq!(fs::read_to_string(root.join("page.html")).unwrap(), FORMATTED);
    assert_eq!(collect_html_files(root, true).unwrap(), vec![root.join("page.html")]);
}

#[cfg(unix)]
#[test]
fn unreadable_subdirectory_does_not_stop_the_batch() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a.html"), MINIFIED);
    write(&root.join("locked/b.html"), MINIFIED);
    write(&root.join("z/c.html"), MINIFIED);
    let locked = root.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // permission bits do not bind a privileged user
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = deminify_directory(root, true, &Options::default());
    let collected = collect_html_files(root, true);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let report = report.unwrap();
    assert_eq!(report.succeeded, vec![root.join("a.html"), root.join("z/c.html")]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, locked);
    assert!(matches!(report.failed[0].error, Error::Walk { .. }));
    assert!(root.join("z/c_formatted.html").exists());

    assert_eq!(
        collected.unwrap(),
        vec![root.join("a.html"), root.join("z/c.html")]
    );
}
