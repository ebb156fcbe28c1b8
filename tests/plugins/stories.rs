use repogate::plugins::stories::{self, StoryExtractor};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run_extractor(dir: &TempDir, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_story-extract"))
        .current_dir(dir.path())
        .env_remove("REPOGATE_LOG")
        .args(args)
        .output()
        .expect("failed to execute story-extract");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

#[test]
fn default_run_writes_both_reports() {
    let tmp = tempdir().unwrap();
    write_file(
        tmp.path(),
        "docs/stories.md",
        "US-2: Dashboard: Shows metrics\nUS-1: Login → \"User can log in\"\n",
    );

    let (code, stdout, stderr) = run_extractor(&tmp, &[]);
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("Total stories: 2"));
    assert!(stdout.contains("With descriptions: 2"));

    let text = fs::read_to_string(tmp.path().join("user_stories_complete_456.txt")).unwrap();
    assert!(text.starts_with("# User Stories\nTotal: 2\n"));
    let login = text.find("US-1 | Login | \"User can log in\"\nSource: docs/stories.md").unwrap();
    let dashboard = text.find("US-2 | Dashboard | \"Shows metrics\"").unwrap();
    assert!(login < dashboard);

    let csv = fs::read_to_string(tmp.path().join("user_stories_complete_456.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Story ID,Title,Description,Source File"));
    assert_eq!(lines.next(), Some("US-1,Login,User can log in,docs/stories.md"));
}

#[test]
fn earlier_root_wins_duplicate_identifiers() {
    let tmp = tempdir().unwrap();
    write_file(tmp.path(), "first/a.md", "US-7: From first root\n");
    write_file(tmp.path(), "second/b.txt", "US-7: From second root\nUS-8: Only here\n");

    let (code, _, _) = run_extractor(
        &tmp,
        &["--root", "first", "--root", "second", "--root", "missing"],
    );
    assert_eq!(code, 0);

    let text = fs::read_to_string(tmp.path().join("user_stories_complete_456.txt")).unwrap();
    assert!(text.contains("US-7 | From first root | \"\"\nSource: first/a.md"));
    assert!(!text.contains("From second root"));
    assert!(text.contains("US-8 | Only here"));
}

#[test]
fn csv_quotes_embedded_commas() {
    let tmp = tempdir().unwrap();
    write_file(tmp.path(), "docs/io.md", "US-3: Export, import → \"Move data\"\n");

    let (code, _, _) = run_extractor(&tmp, &["--csv-out", "out/stories.csv", "--text-out", "out/stories.txt"]);
    assert_eq!(code, 0);

    let csv = fs::read_to_string(tmp.path().join("out/stories.csv")).unwrap();
    assert!(csv.contains("US-3,\"Export, import\",Move data,docs/io.md"));
    assert!(tmp.path().join("out/stories.txt").exists());
}

#[test]
fn reports_are_not_rescanned() {
    let tmp = tempdir().unwrap();
    write_file(tmp.path(), "notes.md", "US-4: Search\n");

    let (code, stdout, _) = run_extractor(&tmp, &["--root", "."]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Total stories: 1"), "stdout: {}", stdout);

    // The previous text report mentions US-4 but must not be read back.
    fs::remove_file(tmp.path().join("notes.md")).unwrap();
    let (code, stdout, _) = run_extractor(&tmp, &["--root", "."]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Total stories: 0"), "stdout: {}", stdout);
}

#[test]
fn empty_tree_still_writes_reports() {
    let tmp = tempdir().unwrap();
    let (code, stdout, _) = run_extractor(&tmp, &[]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Total stories: 0"));
    let text = fs::read_to_string(tmp.path().join("user_stories_complete_456.txt")).unwrap();
    assert_eq!(text, "# User Stories\nTotal: 0\n\n");
}

#[test]
fn config_roots_and_extensions_apply() {
    let tmp = tempdir().unwrap();
    write_file(tmp.path(), "specs/a.rst", "US-5: Reports\n");
    write_file(tmp.path(), "specs/b.md", "US-6: Ignored\n");
    fs::write(
        tmp.path().join("repogate.toml"),
        "[stories]\nsearch_roots = [\"specs\"]\nextensions = [\"rst\"]\n",
    )
    .unwrap();

    let (code, stdout, _) = run_extractor(&tmp, &[]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Total stories: 1"));
    assert!(stdout.contains("US-5 | Reports"));
}

#[test]
fn library_extract_uses_given_roots() {
    let tmp = tempdir().unwrap();
    write_file(tmp.path(), "a/one.md", "**US-10**: Audit log: Every change is recorded\n");
    write_file(tmp.path(), "a/two.txt", "US-9 Offline mode - \"Works without network\"\n");

    let catalog = stories::extract(&[tmp.path().join("a")]);
    assert_eq!(catalog.len(), 2);
    let ids: Vec<&str> = catalog.sorted().into_iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["US-9", "US-10"]);
    let audit = catalog.get("US-10").unwrap();
    assert_eq!(audit.title, "Audit log");
    assert_eq!(audit.description, "Every change is recorded");

    let extractor = StoryExtractor::new(Vec::<PathBuf>::new());
    assert_eq!(extractor.roots().len(), 4);
}

#[test]
fn traversal_order_decides_duplicates_within_a_root() {
    let tmp = tempdir().unwrap();
    write_file(tmp.path(), "docs/a.md", "US-42: First title\n");
    write_file(tmp.path(), "docs/b.md", "US-42: Second title\n");

    let catalog = stories::extract(&[tmp.path().join("docs")]);
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.get("US-42").unwrap().title, "First title");
}
