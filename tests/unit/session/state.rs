use std::sync::Mutex;
use std::time::Duration;

use super::*;
use crate::assets::decode::RasterImage;
use crate::export::sink::InMemorySink;
use crate::layers::model::LayerPatch;
use crate::render::compositor::ExportOpts;
use crate::segment::adapter::FnSegmenter;

fn solid_pair() -> Result<ImagePair, SegmentationError> {
    let bg = RasterImage::filled(8, 6, [10, 20, 30, 255])
        .map_err(|e| SegmentationError::Adapter(e.to_string()))?;
    let fg = RasterImage::filled(8, 6, [0, 0, 0, 0])
        .map_err(|e| SegmentationError::Adapter(e.to_string()))?;
    Ok(ImagePair::new(bg, fg))
}

fn ok_session(opts: SessionOpts) -> Session {
    Session::new(Arc::new(FnSegmenter::new(|_: &SourceImage| solid_pair())), opts)
}

fn source() -> SourceImage {
    SourceImage::from_bytes("photo.png", Vec::new())
}

fn compositor() -> Compositor {
    Compositor::new(ExportOpts::default().with_clear_rgba([0, 0, 0, 255]))
}

#[test]
fn starts_awaiting_upload() {
    let session = ok_session(SessionOpts::default());
    assert_eq!(session.phase(), SessionPhase::AwaitingUpload);
    assert!(session.pair().is_none());
    assert!(session.editor().is_none());
}

#[test]
fn successful_job_moves_to_editing() {
    let mut session = ok_session(SessionOpts::default());
    session.begin(source()).unwrap();
    assert_eq!(session.wait().unwrap(), SessionPhase::Editing);
    assert_eq!(session.phase(), SessionPhase::Editing);
    assert_eq!(session.pair().unwrap().natural_size().width, 8);
    assert!(session.editor().unwrap().is_empty());
}

#[test]
fn second_begin_while_processing_is_rejected() {
    let gate = Arc::new(Mutex::new(()));
    let held = gate.lock().unwrap();
    let worker_gate = Arc::clone(&gate);
    let mut session = Session::new(
        Arc::new(FnSegmenter::new(move |_: &SourceImage| {
            let _g = worker_gate.lock().map_err(|_| SegmentationError::Disconnected)?;
            solid_pair()
        })),
        SessionOpts::default(),
    );

    session.begin(source()).unwrap();
    assert_eq!(session.phase(), SessionPhase::Processing);
    assert!(matches!(
        session.begin(source()),
        Err(TextBehindError::Validation(_))
    ));
    assert_eq!(session.poll().unwrap(), SessionPhase::Processing);

    drop(held);
    assert_eq!(session.wait().unwrap(), SessionPhase::Editing);
}

#[test]
fn poll_eventually_reports_editing() {
    let mut session = ok_session(SessionOpts::default());
    session.begin(source()).unwrap();
    let mut phase = session.poll().unwrap();
    for _ in 0..500 {
        if phase == SessionPhase::Editing {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
        phase = session.poll().unwrap();
    }
    assert_eq!(phase, SessionPhase::Editing);
}

#[test]
fn failed_job_returns_to_upload() {
    let mut session = Session::new(
        Arc::new(FnSegmenter::new(|_: &SourceImage| {
            Err(SegmentationError::Adapter("no subject found".to_owned()))
        })),
        SessionOpts::default(),
    );
    session.begin(source()).unwrap();
    let err = session.wait().unwrap_err();
    assert!(matches!(
        err,
        TextBehindError::Segmentation(SegmentationError::Adapter(_))
    ));
    assert_eq!(session.phase(), SessionPhase::AwaitingUpload);
    assert!(session.pair().is_none());
}

#[test]
fn panicking_worker_reports_disconnected() {
    let mut session = Session::new(
        Arc::new(FnSegmenter::new(|_: &SourceImage| -> Result<ImagePair, SegmentationError> {
            panic!("matting model crashed")
        })),
        SessionOpts::default(),
    );
    session.begin(source()).unwrap();
    let err = session.wait().unwrap_err();
    assert!(matches!(
        err,
        TextBehindError::Segmentation(SegmentationError::Disconnected)
    ));
    assert_eq!(session.phase(), SessionPhase::AwaitingUpload);
}

#[test]
fn discard_retention_clears_layers_on_new_image() {
    let mut session = ok_session(SessionOpts::default());
    session.begin(source()).unwrap();
    session.wait().unwrap();
    session.editor_mut().unwrap().add_layer();

    session.begin(source()).unwrap();
    assert!(session.editor().is_none());
    session.wait().unwrap();
    assert!(session.editor().unwrap().is_empty());
}

#[test]
fn keep_retention_carries_layers_over() {
    let mut session =
        ok_session(SessionOpts::default().with_retention(LayerRetention::Keep));
    session.begin(source()).unwrap();
    session.wait().unwrap();
    let id = session.editor_mut().unwrap().add_layer();

    session.begin(source()).unwrap();
    session.wait().unwrap();
    let editor = session.editor().unwrap();
    assert_eq!(editor.len(), 1);
    assert!(editor.layer(id).is_some());
}

#[test]
fn reset_drops_everything() {
    let mut session = ok_session(SessionOpts::default());
    session.begin(source()).unwrap();
    session.wait().unwrap();
    session.editor_mut().unwrap().add_layer();

    session.reset();
    assert_eq!(session.phase(), SessionPhase::AwaitingUpload);
    assert!(session.pair().is_none());
    assert_eq!(session.wait().unwrap(), SessionPhase::AwaitingUpload);
}

#[test]
fn export_requires_an_image() {
    let session = ok_session(SessionOpts::default());
    let mut sink = InMemorySink::new();
    let err = session
        .export(&mut compositor(), 400.0, &mut sink)
        .unwrap_err();
    assert!(matches!(err, TextBehindError::Validation(_)));
    assert!(sink.files().is_empty());
}

#[test]
fn export_writes_natural_size_png() {
    let mut session = ok_session(SessionOpts::default());
    session.begin(source()).unwrap();
    session.wait().unwrap();
    let editor = session.editor_mut().unwrap();
    editor.add_layer();
    editor.update_selected(&LayerPatch {
        text: Some(String::new()),
        ..LayerPatch::default()
    });

    let mut sink = InMemorySink::new();
    let receipt = session.export(&mut compositor(), 4.0, &mut sink).unwrap();
    assert_eq!((receipt.width, receipt.height), (8, 6));
    assert!(receipt.file_name.starts_with("edited-"));
    assert_eq!(sink.files().len(), 1);
}
