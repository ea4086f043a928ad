use snoopy_core::{Entry, ErrorNode, Folder, SnoopError};
use snoopy_render::{
    ERROR_PREFIX, FILE_PREFIX, FOLDER_PREFIX, Formatter, NameOnly, RenderOptions, Sink, SizeOnly,
    write_to,
};
use snoopy_scan::{WalkConfig, Walker};
use snoopy_transform::{PruneOptions, prune, sort};
use std::fs;
use tempfile::TempDir;

/// project/
///   a.txt (100) .. e.txt (500)
///   empty/
///   src/main.rs (2048)
fn walk_fixture() -> (TempDir, Folder) {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("project");
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir(root.join("empty")).unwrap();
    for (i, name) in ["a.txt", "b.txt", "c.txt", "d.txt", "e.txt"].iter().enumerate() {
        fs::write(root.join(name), vec![b'x'; (i + 1) * 100]).unwrap();
    }
    fs::write(root.join("src/main.rs"), vec![b'x'; 2048]).unwrap();

    let tree = Walker::new().walk(&WalkConfig::new(&root)).unwrap();
    let tree = sort::alphabetic(tree, false);
    (temp, tree)
}

fn names_only(options: RenderOptions) -> Formatter {
    Formatter::new(options)
        .folder_label(NameOnly::default())
        .file_label(NameOnly::default())
}

#[test]
fn test_default_prefixes_and_indent() {
    let (_temp, tree) = walk_fixture();
    let text = names_only(RenderOptions::default()).render(&tree);
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], format!("{FOLDER_PREFIX}project"));
    assert_eq!(lines[1], format!(" │ {FILE_PREFIX}a.txt"));
    assert!(lines.contains(&format!(" │ {FOLDER_PREFIX}empty").as_str()));
    assert!(lines.contains(&format!(" │  │ {FILE_PREFIX}main.rs").as_str()));
    assert_eq!(lines.len(), 1 + 5 + 2 + 1);
}

#[test]
fn test_max_files_remaining_line() {
    let (_temp, tree) = walk_fixture();
    let options = RenderOptions::builder()
        .max_files(2usize)
        .build()
        .unwrap();
    let text = names_only(options).render(&tree);

    let root_files = text
        .lines()
        .filter(|l| l.starts_with(&format!(" │ {FILE_PREFIX}")))
        .count();
    assert_eq!(root_files, 2);
    assert!(text.ends_with(" │ ✂️  [Folders: 0 | Files: 3 | Errors: 0]\n"));
}

#[test]
fn test_pruned_hidden_nodes_are_suppressed() {
    let (_temp, tree) = walk_fixture();
    let options = PruneOptions {
        hide_only: true,
        folders: false,
        ..Default::default()
    };
    let tree = prune::by_size_expr(tree, "<= 300 B", options).unwrap().unwrap();

    let text = names_only(RenderOptions::default()).render(&tree);
    assert!(!text.contains("a.txt"));
    assert!(!text.contains("c.txt"));
    assert!(text.contains("d.txt"));
    // Hidden nodes are not reported as remaining
    assert!(!text.contains("✂️"));

    let capped = names_only(RenderOptions {
        max_files: Some(1),
        ..Default::default()
    })
    .render(&tree);
    assert!(capped.contains("d.txt"));
    assert!(!capped.contains("e.txt"));
    assert!(capped.contains("Files: 1 |"));
}

#[test]
fn test_error_lines() {
    let (temp, mut tree) = walk_fixture();
    let err = SnoopError::enumeration(
        temp.path().join("project/locked"),
        std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied"),
    );
    let error = ErrorNode::capture(&err);
    let when = error.name().to_string();
    tree.push(error);

    let text = Formatter::default().render(&tree);
    let line = text.lines().find(|l| l.contains(ERROR_PREFIX)).unwrap();
    assert!(line.starts_with(&format!(" │ {ERROR_PREFIX}Error(")));
    assert!(line.contains("Permission denied"));
    assert!(line.ends_with(&format!("[{when}]")));

    let capped = Formatter::new(RenderOptions {
        max_errors: Some(0),
        ..Default::default()
    })
    .render(&tree);
    assert!(!capped.contains(ERROR_PREFIX));
    assert!(capped.contains("Errors: 1]"));
}

#[test]
fn test_render_is_deterministic() {
    let (_temp, tree) = walk_fixture();
    let formatter = Formatter::new(RenderOptions {
        max_depth: Some(1),
        max_items: Some(4),
        ..Default::default()
    })
    .folder_label(SizeOnly::default())
    .file_label(SizeOnly::default());

    let first = formatter.render(&tree);
    let second = formatter.render(&tree.clone());
    assert_eq!(first, second);
    assert!(first.starts_with(&format!("{FOLDER_PREFIX}project(B=3548.00)")));
}

#[test]
fn test_snapshot_to_file() {
    let (temp, tree) = walk_fixture();
    let text = Formatter::default().render(&tree);
    let path = temp.path().join("snapshot.txt");

    write_to(&Sink::File(path.clone()), &text).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), text);
}
