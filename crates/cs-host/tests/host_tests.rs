use cs_core::{HostConfig, OutputFormat, SourceFile, StripConfig, StripError, TransformMode};
use cs_host::{BareFormatter, ExecutionHost, StandardFormatter};
use std::sync::{mpsc, Mutex};

fn sample() -> Vec<SourceFile> {
    vec![
        SourceFile::text("1", "a.js", "// header\nconst x = 1;"),
        SourceFile::text("2", "b.py", "# header\nx = 1"),
    ]
}

fn config_with_timeout(ms: u64) -> StripConfig {
    StripConfig {
        host: HostConfig { request_timeout_ms: ms, ..HostConfig::default() },
        ..StripConfig::default()
    }
}

// ========== End to end ==========

#[tokio::test]
async fn test_remove_comments_end_to_end() {
    let host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    let result = host.run(sample(), TransformMode::RemoveComments, OutputFormat::Plain).await.unwrap();
    assert_eq!(result.lines, vec!["const x = 1;", "", "x = 1"]);
    assert!(result.lines.iter().all(|l| !l.contains("header")));
    assert!(result.size_savings_percent > 0);
}

#[tokio::test]
async fn test_headers_and_binary_files() {
    let host = ExecutionHost::create(&StripConfig::default(), StandardFormatter).unwrap();
    let files = vec![
        SourceFile::text("1", "a.js", "// header\nconst x = 1;"),
        SourceFile::binary("2", "logo.png"),
        SourceFile::text("3", "b.py", "# header\nx = 1"),
    ];
    let result = host.run(files, TransformMode::Minify, OutputFormat::Markdown).await.unwrap();
    assert_eq!(
        result.lines,
        vec!["### a.js", "", "```js", "const x = 1;", "```", "", "### b.py", "", "```py", "x = 1", "```"]
    );
}

#[tokio::test]
async fn test_sequential_requests_reuse_host() {
    let host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    for mode in [TransformMode::Minify, TransformMode::RemoveComments, TransformMode::Raw] {
        let result = host.run(sample(), mode, OutputFormat::Plain).await.unwrap();
        assert!(result.lines.contains(&"x = 1".to_string()));
    }
}

// ========== Raw fast path ==========

#[tokio::test]
async fn test_raw_is_verbatim() {
    let host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    let result = host.run(sample(), TransformMode::Raw, OutputFormat::Xml).await.unwrap();
    assert_eq!(result.lines, vec!["// header", "const x = 1;", "", "# header", "x = 1"]);
    assert_eq!(result.size_savings_percent, 0);
}

#[tokio::test]
async fn test_raw_supersedes_pending() {
    let host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    let first = host.submit(sample(), TransformMode::Minify, OutputFormat::Plain);
    let raw = host.run(sample(), TransformMode::Raw, OutputFormat::Plain).await.unwrap();
    assert_eq!(raw.lines.len(), 5);
    assert!(first.wait().await.unwrap_err().is_cancelled());
}

// ========== Cancellation ==========

#[tokio::test]
async fn test_newer_request_cancels_older() {
    let host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    let a = host.submit(vec![SourceFile::text("1", "old.js", "let old = 1; // a")], TransformMode::Minify, OutputFormat::Plain);
    let b = host.submit(sample(), TransformMode::RemoveComments, OutputFormat::Plain);
    assert_ne!(a.id(), b.id());

    let err = a.wait().await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(matches!(err, StripError::Cancelled { .. }));

    let result = b.wait().await.unwrap();
    assert_eq!(result.lines, vec!["const x = 1;", "", "x = 1"]);
}

// ========== Timeout ==========

#[tokio::test]
async fn test_timeout_then_recover() {
    let (release, gate) = mpsc::channel::<()>();
    let gate = Mutex::new(gate);
    let formatter = move |label: &str, _: &str, _: OutputFormat| {
        if label == "slow.js" {
            let _ = gate.lock().unwrap().recv();
        }
        (Vec::<String>::new(), Vec::<String>::new())
    };
    let host = ExecutionHost::create(&config_with_timeout(200), formatter).unwrap();

    let slow = vec![SourceFile::text("1", "slow.js", "a(); // x")];
    let err = host.run(slow, TransformMode::RemoveComments, OutputFormat::Plain).await.unwrap_err();
    assert!(err.is_timeout());

    release.send(()).unwrap();
    let fast = vec![SourceFile::text("2", "fast.js", "b(); // y")];
    let result = host.run(fast, TransformMode::RemoveComments, OutputFormat::Plain).await.unwrap();
    assert_eq!(result.lines, vec!["b();"]);
}

// ========== Progress ==========

#[tokio::test]
async fn test_progress_every_interval_and_on_completion() {
    let host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    let mut progress = host.subscribe_progress();
    let files: Vec<SourceFile> = (0..25)
        .map(|i| SourceFile::text(i.to_string(), format!("f{i}.js"), "let a = 1; // c"))
        .collect();

    let handle = host.submit(files, TransformMode::RemoveComments, OutputFormat::Plain);
    let id = handle.id();
    let result = handle.wait().await.unwrap();
    assert_eq!(result.lines.iter().filter(|l| *l == "let a = 1;").count(), 25);

    let mut seen = Vec::new();
    while let Ok(update) = progress.try_recv() {
        assert_eq!(update.id, id);
        assert_eq!(update.total_files, 25);
        seen.push((update.processed_files, update.percent));
    }
    assert_eq!(seen, vec![(10, 40), (20, 80), (25, 100)]);
}

#[tokio::test]
async fn test_progress_for_empty_batch() {
    let host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    let mut progress = host.subscribe_progress();
    let result = host
        .run(vec![SourceFile::binary("1", "a.bin")], TransformMode::Minify, OutputFormat::Plain)
        .await
        .unwrap();
    assert!(result.lines.is_empty());
    let last = progress.try_recv().unwrap();
    assert_eq!(last.percent, 100);
    assert_eq!(last.total_files, 0);
}

// ========== Lifecycle ==========

#[tokio::test]
async fn test_terminate_fails_pending_and_later_requests() {
    let mut host = ExecutionHost::create(&StripConfig::default(), BareFormatter).unwrap();
    let pending = host.submit(sample(), TransformMode::Minify, OutputFormat::Plain);
    host.terminate();
    host.terminate();
    assert!(host.is_terminated());

    assert!(matches!(pending.wait().await, Err(StripError::HostClosed)));
    let err = host.run(sample(), TransformMode::Raw, OutputFormat::Plain).await.unwrap_err();
    assert!(matches!(err, StripError::HostClosed));
}

#[test]
fn test_create_requires_runtime() {
    let err = ExecutionHost::create(&StripConfig::default(), BareFormatter).err().unwrap();
    assert!(matches!(err, StripError::Other(_)));
}
