use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use docopener_channel::{MethodCall, MethodChannel, MethodReply};
use docopener_core::{DocOpenerError, DocOpenerResult};
use docopener_open::{
    Completion, DocumentOpener, HostWindow, NativeOpener, OpenDocumentRequest, OpenDocumentResult,
    OpenerConfig, PreparedDocument, ViewerBackend,
};
use serde_json::json;

/// Completes from a worker thread after a delay.
struct Deferred;

impl DocumentOpener for Deferred {
    fn open_with(&self, _request: OpenDocumentRequest, completion: Completion) {
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            completion.complete(OpenDocumentResult::opened());
        });
    }
}

/// Loses the completion handle without answering.
struct Forgetful;

impl DocumentOpener for Forgetful {
    fn open_with(&self, _request: OpenDocumentRequest, completion: Completion) {
        drop(completion);
    }
}

/// Backend with no viewer for anything.
struct NoViewers;

impl ViewerBackend for NoViewers {
    fn platform(&self) -> &'static str {
        "test"
    }

    fn view(
        &self,
        document: &PreparedDocument,
        _window: Option<&dyn HostWindow>,
    ) -> DocOpenerResult<()> {
        Err(DocOpenerError::no_viewer(document.mime_type))
    }
}

#[test]
fn deferred_reply_arrives_once_from_worker_thread() {
    let channel = MethodChannel::new(Deferred);
    let (tx, rx) = mpsc::channel();
    channel.handle(MethodCall::open_document("/tmp/a.csv"), move |reply| {
        tx.send(reply).unwrap();
    });

    let reply = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(
        reply,
        MethodReply::Success(r#"{"type":"done","message":"File opened successfully"}"#.into())
    );
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn dropped_completion_still_replies() {
    let channel = MethodChannel::new(Forgetful);
    let reply = channel.invoke(MethodCall::open_document("/tmp/a.csv"));
    assert_eq!(
        reply.payload(),
        Some(r#"{"type":"error","message":"Unknown error occurred"}"#)
    );
}

#[test]
fn end_to_end_through_native_opener() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("valid.pdf");
    std::fs::write(&pdf, b"%PDF-1.4").unwrap();

    let config = OpenerConfig {
        preview_fallback: false,
        ..OpenerConfig::default()
    };
    let channel = MethodChannel::new(NativeOpener::with_backend(NoViewers, config));

    let cases = [
        (
            json!({}),
            r#"{"type":"error","message":"File path cannot be null"}"#,
        ),
        (
            json!({"file_path": "/tmp/report.doc"}),
            r#"{"type":"error","message":"Only PDF and CSV files are supported"}"#,
        ),
        (
            json!({"file_path": dir.path().join("missing.pdf")}),
            r#"{"type":"error","message":"File does not exist"}"#,
        ),
        (
            json!({"file_path": pdf}),
            r#"{"type":"noAppToOpen","message":"No app found to open this file type"}"#,
        ),
        (
            json!(["not", "a", "mapping"]),
            r#"{"type":"error","message":"Invalid arguments"}"#,
        ),
    ];

    for (arguments, expected) in cases {
        let reply = channel.invoke(MethodCall::new("openDocument", arguments.clone()));
        assert_eq!(reply.payload(), Some(expected), "arguments {arguments}");
    }
}

#[test]
fn method_names_are_case_sensitive() {
    let channel = MethodChannel::new(Deferred);
    let reply = channel.invoke(MethodCall::new("OpenDocument", json!({"file_path": "/tmp/a.pdf"})));
    assert!(reply.is_not_implemented());
}
