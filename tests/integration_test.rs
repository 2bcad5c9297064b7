use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use support_metrics::app::ATTACHMENTS_DIR;
use support_metrics::{
    logger, App, Category, Config, DuplicatePolicy, MetricShape, MetricValue, MetricsProcessor,
    MultipartDecoder, SubmissionPart,
};
use tempfile::TempDir;

const BOUNDARY: &str = "----support-metrics";

/// 构造一个 multipart 报文
fn build_body(parts: &[(&str, &str, &str, &str)], attachments: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (label, category, code_name, form) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-urlencoded; name=\"{label}\"\r\n\
                 category: {category}\r\n\
                 codeName: {code_name}\r\n\r\n{form}\r\n"
            )
            .as_bytes(),
        );
    }
    for (file_name, content) in attachments {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: attachment; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn sample_body() -> Vec<u8> {
    build_body(
        &[
            ("Subject", "form", "subject", "0=Site+is+slow"),
            ("E-mail", "form", "email", "0=admin%40example.com"),
            ("Operating system", "support.metrics.system", "os", "0=Linux"),
            ("Modules", "support.metrics.system", "modules", "0=a&1=b&2=c"),
            ("Variables", "support.metrics.environment", "vars", "name=x&size=42"),
            ("GPU", "support.metrics.gpu", "gpu", "0=none"),
            ("Cache", "support.metrics.counters", "cache", "0=12"),
        ],
        &[("trace.log", b"line1\r\nline2"), ("../dump.bin", &[0u8, 1, 2, 255])],
    )
}

fn config_for(dir: &TempDir, body: &[u8]) -> Config {
    let submission = dir.path().join("submission.bin");
    std::fs::write(&submission, body).unwrap();
    Config {
        submission_file: submission.to_string_lossy().to_string(),
        output_dir: dir.path().join("out").to_string_lossy().to_string(),
        ..Config::default()
    }
}

#[test]
fn test_decode_and_process() {
    let parts = MultipartDecoder::new(BOUNDARY).decode(&sample_body()).unwrap();
    assert_eq!(parts.len(), 9);

    let processor = MetricsProcessor::from_parts(parts).unwrap();
    let snapshot = processor.snapshot();
    assert_eq!(snapshot.bucket(Category::Form).unwrap().len(), 2);
    assert_eq!(snapshot.bucket(Category::System).unwrap().len(), 2);
    assert_eq!(snapshot.bucket(Category::Environment).unwrap().len(), 1);
    assert_eq!(snapshot.bucket(Category::Counters).unwrap().len(), 1);
    assert_eq!(snapshot.record_count(), 6);
    assert_eq!(processor.attachments().len(), 2);
    assert_eq!(processor.attachments()[1].content, vec![0u8, 1, 2, 255]);

    assert_eq!(
        processor
            .get_metric(Category::System, "modules", MetricShape::ValueList)
            .unwrap(),
        MetricValue::List(vec!["a".into(), "b".into(), "c".into()])
    );
}

#[test]
fn test_json_projection() {
    let parts = MultipartDecoder::new(BOUNDARY).decode(&sample_body()).unwrap();
    let processor = MetricsProcessor::from_parts(parts).unwrap();
    let json: Value = serde_json::from_str(&processor.to_json().unwrap()).unwrap();

    assert_eq!(
        json,
        json!({
            "system": {
                "Operating system": "Linux",
                "Modules": ["a", "b", "c"]
            },
            "environment": { "Variables": { "name": "x", "size": "42" } },
            "counters": { "Cache": "12" },
            "tasks": {},
            "eventLog": {}
        })
    );
}

#[test]
fn test_attachments_never_rendered() {
    let parts: Vec<_> = (0..5)
        .map(|i| SubmissionPart::attachment(format!("file{i}.txt"), format!("0=secret{i}")))
        .collect();
    let processor = MetricsProcessor::from_parts(parts).unwrap();
    let text = processor.to_json().unwrap();
    assert!(!text.contains("secret"));
    assert!(!text.contains("file0.txt"));
}

#[test]
fn test_duplicate_submission_rejected() {
    let body = build_body(
        &[
            ("A", "support.metrics.tasks", "queue", "0=1"),
            ("B", "support.metrics.tasks", "queue", "0=2"),
        ],
        &[],
    );
    let parts = MultipartDecoder::new(BOUNDARY).decode(&body).unwrap();
    assert!(MetricsProcessor::from_parts(parts.clone()).is_err());

    let processor =
        MetricsProcessor::from_parts_with_policy(parts, DuplicatePolicy::Overwrite).unwrap();
    assert_eq!(
        processor.single_value(Category::Tasks, "queue").unwrap(),
        Some("2".to_string())
    );
}

#[tokio::test]
async fn test_app_writes_outputs() {
    logger::init();

    let dir = TempDir::new().unwrap();
    let config = config_for(&dir, &sample_body());

    let report = App::initialize(config).await.unwrap().run().await.unwrap();
    assert_eq!(report.records, 6);
    assert_eq!(report.attachments, 2);
    assert!(report.missing_custom_metrics.is_empty());

    let out = dir.path().join("out");
    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("metrics.json")).unwrap()).unwrap();
    assert_eq!(json["counters"]["Cache"], "12");

    let message = std::fs::read_to_string(out.join("message.txt")).unwrap();
    assert!(message.starts_with("Site is slow\n\n"));
    assert!(message.contains("E-mail: admin@example.com"));

    let attachments = out.join(ATTACHMENTS_DIR);
    assert!(attachments.join("metrics.json").exists());
    assert_eq!(
        std::fs::read(attachments.join("trace.log")).unwrap(),
        b"line1\r\nline2"
    );
    assert_eq!(
        std::fs::read(attachments.join("dump.bin")).unwrap(),
        vec![0u8, 1, 2, 255]
    );
}

#[tokio::test]
async fn test_app_reports_missing_custom_metrics() {
    let dir = TempDir::new().unwrap();
    let catalog = dir.path().join("catalog.toml");
    std::fs::write(
        &catalog,
        r#"
[[metric]]
code_name = "cache"
display_name = "Cache"
assembly_name = "SupportHelper"
class_name = "SupportHelper.CacheMetric"
selected = true

[[metric]]
code_name = "webfarm"
display_name = "Web farm"
assembly_name = "SupportHelper"
class_name = "SupportHelper.WebFarmMetric"
selected = true
"#,
    )
    .unwrap();

    let mut config = config_for(&dir, &sample_body());
    config.catalog_file = Some(catalog.to_string_lossy().to_string());

    let report = App::initialize(config).await.unwrap().run().await.unwrap();
    assert_eq!(report.missing_custom_metrics, vec!["webfarm".to_string()]);
}

#[tokio::test]
async fn test_app_fails_on_missing_submission() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        submission_file: dir.path().join("nope.bin").to_string_lossy().to_string(),
        output_dir: dir.path().join("out").to_string_lossy().to_string(),
        ..Config::default()
    };

    let app = App::initialize(config).await.unwrap();
    assert!(app.run().await.is_err());
}
