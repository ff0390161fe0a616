//! End-to-end scenarios over a realistic media info document.

use std::io;
use std::sync::{Arc, Mutex};

use vivid_core::{from_reader, parse, Json, JsonError};

const MEDIA_INFO: &str = r#"{
    "streams": [
        {
            "index": 0,
            "codec_name": "h264",
            "codec_type": "video",
            "width": 1920,
            "height": 1080,
            "avg_frame_rate": "30000/1001",
            "tags": {"language": "und", "handler_name": "VideoHandler"}
        },
        {
            "index": 1,
            "codec_name": "aac",
            "codec_type": "audio",
            "sample_rate": "48000",
            "channels": 2,
            "tags": {"language": "eng"}
        }
    ],
    "format": {
        "filename": "clip.mp4",
        "nb_streams": 2,
        "duration": "63.040000",
        "size": "19023451",
        "tags": {"major_brand": "isom", "encoder": "Lavf58.29.100"}
    }
}"#;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

/// Run `f` with a subscriber that records every event, and return the log.
fn with_captured_logs(f: impl FnOnce()) -> String {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    capture.text()
}

// ============================================================================
// Type names
// ============================================================================

#[test]
fn type_name_of_number_and_string() {
    assert_eq!(parse(r#"{"a":100}"#).unwrap().get("a").type_name(), "number");
    assert_eq!(
        parse(r#"{"a":"100"}"#).unwrap().get("a").type_name(),
        "string"
    );
}

// ============================================================================
// Reading a media info document
// ============================================================================

#[test]
fn read_stream_properties() {
    let doc = parse(MEDIA_INFO).unwrap();
    let video = doc.get("streams").at(0);
    assert_eq!(video.get("codec_type").as_string(), "video");
    assert_eq!(video.get("width").as_int(), 1920);
    assert_eq!(video.get("height").as_long(), 1080);

    let audio = doc.get("streams").at(-1);
    assert_eq!(audio.get("sample_rate").as_int(), 48000);
    assert_eq!(audio.get("channels").as_string(), "2");
}

#[test]
fn numeric_strings_coerce() {
    let doc = parse(MEDIA_INFO).unwrap();
    let format = doc.get("format");
    assert_eq!(format.get("duration").as_double(), 63.04);
    assert_eq!(format.get("duration").as_int(), 63);
    assert_eq!(format.get("size").as_long(), 19_023_451);
    assert_eq!(doc.get("streams").at(0).get("avg_frame_rate").as_double_or(-1.0), -1.0);
}

#[test]
fn optional_fields_fall_back_to_defaults() {
    let doc = parse(MEDIA_INFO).unwrap();
    let audio = doc.get("streams").at(1);
    assert_eq!(audio.get("width").as_int_or(-1), -1);
    assert_eq!(audio.get("tags").get("title").as_string_or("untitled"), "untitled");
    assert!(!doc.get("chapters").at(0).get("start").is_defined());
}

#[test]
fn find_all_codec_names() {
    let doc = parse(MEDIA_INFO).unwrap();
    let names: Vec<String> = doc.find_all("codec_name").map(|v| v.as_string()).collect();
    assert_eq!(names, vec!["h264", "aac"]);
}

#[test]
fn find_all_counts_every_occurrence() {
    let doc = parse(MEDIA_INFO).unwrap();
    assert_eq!(doc.find_all("language").count(), 2);
    assert_eq!(doc.find_all("tags").count(), 3);
    assert_eq!(doc.find("tags").get("major_brand").as_string(), "isom");
}

#[test]
fn iterate_streams() {
    let doc = parse(MEDIA_INFO).unwrap();
    let kinds: Vec<String> = doc
        .get("streams")
        .as_values()
        .iter()
        .map(|s| s.get("codec_type").as_string())
        .collect();
    assert_eq!(kinds, vec!["video", "audio"]);
    assert_eq!(
        doc.get("format").get("tags").as_keys(),
        vec!["encoder", "major_brand"]
    );
}

// ============================================================================
// Editing
// ============================================================================

#[test]
fn annotate_and_render() {
    let doc = parse(MEDIA_INFO).unwrap();
    doc.get("analysis").get("video").set("hdr", false).unwrap();
    doc.get("analysis").get("warnings").push("variable frame rate").unwrap();
    doc.get("streams").at(1).get("tags").set("title", "Stereo").unwrap();

    let reparsed = parse(&doc.to_pretty_string()).unwrap();
    assert_eq!(reparsed, doc);
    assert!(!reparsed.get("analysis").get("video").get("hdr").as_boolean_or(true));
    assert_eq!(
        reparsed.get("analysis").get("warnings").at(0).as_string(),
        "variable frame rate"
    );
    assert_eq!(
        reparsed.get("streams").at(1).get("tags").get("title").as_string(),
        "Stereo"
    );
}

#[test]
fn illegal_writes_leave_the_tree_unmodified() {
    let doc = parse(MEDIA_INFO).unwrap();
    let before = doc.to_compact_string();

    let err = doc.get("format").get("nb_streams").set("x", 1).unwrap_err();
    assert!(matches!(err, JsonError::Usage(_)));
    let err = doc.get("format").set_at(0, 1).unwrap_err();
    assert!(matches!(err, JsonError::Usage(_)));
    let err = doc
        .get("format")
        .get("filename")
        .get("deeper")
        .at(2)
        .set("x", 1)
        .unwrap_err();
    assert!(err.is_usage());

    assert_eq!(doc.to_compact_string(), before);
}

#[test]
fn build_document_from_scratch() {
    let doc = Json::object();
    doc.get("format").set("filename", "out.mkv").unwrap();
    doc.get("streams").at(0).set("codec_name", "vp9").unwrap();
    doc.get("streams").at(1).set("codec_name", "opus").unwrap();
    assert_eq!(
        doc.to_compact_string(),
        r#"{"format":{"filename":"out.mkv"},"streams":[{"codec_name":"vp9"},{"codec_name":"opus"}]}"#
    );
}

#[test]
fn read_from_a_stream() {
    let doc = from_reader(MEDIA_INFO.as_bytes()).unwrap();
    assert_eq!(doc.get("format").get("nb_streams").as_int(), 2);
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn vivification_is_traced() {
    let log = with_captured_logs(|| {
        let doc = Json::object();
        doc.get("a").get("b").set("c", 1).unwrap();
    });
    assert!(log.contains("materialized missing container"), "{log}");
}

#[test]
fn parse_failures_are_logged() {
    let log = with_captured_logs(|| {
        assert!(parse("[1,]").is_err());
    });
    assert!(!log.is_empty());
}

#[test]
fn usage_faults_are_logged() {
    let log = with_captured_logs(|| {
        assert!(Json::from(1).set("k", 2).is_err());
    });
    assert!(log.contains("not a dictionary"), "{log}");
}
