//! End-to-end pipeline tests against stub providers.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use codewiki::ai::provider::{Completion, CompletionProvider, EmbeddingProvider};
use codewiki::storage::SqliteStore;
use codewiki::types::WikiError;
use codewiki::{
    AnalysisScheduler, FileAnalysisWorker, PersistenceGateway, RetryingCompletionClient, wiki,
};

/// Files containing this marker make the stub completion provider fail.
const POISON_MARKER: &str = "fail_this_file";

struct StubCompletions;

#[async_trait]
impl CompletionProvider for StubCompletions {
    async fn complete(&self, prompt: &str) -> codewiki::Result<Completion> {
        if prompt.contains(POISON_MARKER) {
            return Err(WikiError::api("stub", "invalid request"));
        }
        Ok(Completion {
            content: "stub summary".to_string(),
            model: "stub-model".to_string(),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

struct StubEmbeddings;

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    async fn embed(&self, _text: &str) -> codewiki::Result<Vec<f32>> {
        Ok(vec![0.5, -0.5])
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

fn scheduler(concurrency: usize) -> AnalysisScheduler {
    let worker = FileAnalysisWorker::new(
        RetryingCompletionClient::new(Arc::new(StubCompletions)),
        Arc::new(StubEmbeddings),
    );
    AnalysisScheduler::new(worker, concurrency)
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dirs");
    }
    std::fs::write(path, contents).expect("write file");
}

/// Tree with two analyzable files, one poisoned file and assorted noise.
fn seed_tree(root: &Path) {
    write(
        root,
        "app.py",
        "class App:\n    def run(self):\n        pass\n",
    );
    write(root, "util/helpers.py", "def helper(x):\n    return x\n");
    write(root, "util/__init__.py", "");
    write(root, "broken.py", "# fail_this_file\nclass Broken:\n    pass\n");
    write(root, ".venv/lib/site.py", "def hidden():\n    pass\n");
    write(root, "notes.txt", "not source");
}

fn path_set(batch: &[codewiki::FileAnalysis]) -> BTreeSet<String> {
    batch.iter().map(|a| a.relative_path.clone()).collect()
}

#[tokio::test]
async fn test_failing_file_is_omitted_without_aborting_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_tree(dir.path());

    let batch = scheduler(4).analyze(dir.path()).await.expect("analyze");

    let expected: BTreeSet<String> = ["app.py", "util/helpers.py"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(path_set(&batch), expected);

    let app = batch
        .iter()
        .find(|a| a.relative_path == "app.py")
        .expect("app.py analyzed");
    assert_eq!(app.classes, vec!["App"]);
    assert_eq!(app.functions, vec!["run"]);
    assert_eq!(app.summary, "stub summary");
    assert_eq!(app.chunk_embeddings, vec![vec![0.5, -0.5]]);
}

#[tokio::test]
async fn test_rerun_on_unchanged_tree_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_tree(dir.path());
    let scheduler = scheduler(2);

    let first = scheduler.analyze(dir.path()).await.expect("first run");
    let second = scheduler.analyze(dir.path()).await.expect("second run");

    assert_eq!(path_set(&first), path_set(&second));
}

#[tokio::test]
async fn test_empty_tree_yields_empty_batch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let batch = scheduler(4).analyze(dir.path()).await.expect("analyze");
    assert!(batch.is_empty());
}

#[tokio::test]
async fn test_full_pipeline_persists_and_renders() {
    let dir = tempfile::tempdir().expect("tempdir");
    seed_tree(dir.path());

    let batch = scheduler(4).analyze(dir.path()).await.expect("analyze");

    let store = SqliteStore::open(dir.path().join("wiki.db")).expect("open store");
    let stored = store.persist(&batch).await.expect("persist");
    assert_eq!(stored, batch.len());
    assert_eq!(store.count().expect("count"), batch.len());

    // A second persist replaces rather than duplicates
    let stored_again = store.persist(&batch).await.expect("persist again");
    assert_eq!(stored_again, batch.len());
    assert_eq!(store.count().expect("count"), batch.len());

    let markdown = wiki::render_wiki(&batch);
    assert!(markdown.starts_with("# Code Wiki"));
    assert!(markdown.contains("## app.py"));
    assert!(markdown.contains("## util/helpers.py"));
    assert!(!markdown.contains("broken.py"));

    let output = dir.path().join("docs/wiki.md");
    wiki::write_wiki(&output, &markdown).expect("write wiki");
    assert_eq!(std::fs::read_to_string(&output).expect("read back"), markdown);
}
