use super::*;

fn png_bytes() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn placeholders_are_substituted() {
    let seg = CommandSegmenter::new("tool").args(["--in", INPUT, "--out={output}"]);
    let cmd = seg.command_for(Path::new("/tmp/a.png"), Path::new("/tmp/b.png"));
    let args: Vec<_> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args, vec!["--in", "/tmp/a.png", "--out=/tmp/b.png"]);
    assert_eq!(cmd.get_program(), "tool");
}

#[test]
fn rembg_preset() {
    let seg = CommandSegmenter::rembg();
    assert_eq!(seg.program(), "rembg");
    assert_eq!(seg.args, vec!["i", "{input}", "{output}"]);
}

#[test]
fn missing_program_is_an_environment_error() {
    let seg = CommandSegmenter::new("textbehind-definitely-not-installed").arg(INPUT);
    let err = seg
        .segment(&SourceImage::from_bytes("a.png", png_bytes()))
        .unwrap_err();
    assert!(matches!(err, SegmentationError::Environment(_)), "{err:?}");
}

#[test]
fn undecodable_source_fails_before_spawning() {
    let seg = CommandSegmenter::new("textbehind-definitely-not-installed");
    let err = seg
        .segment(&SourceImage::from_bytes("a.png", b"nope".to_vec()))
        .unwrap_err();
    assert!(matches!(err, SegmentationError::UnsupportedFormat(_)));
}

#[cfg(unix)]
#[test]
fn copying_program_produces_a_pair() {
    let seg = CommandSegmenter::new("cp").args([INPUT, OUTPUT]);
    let pair = seg
        .segment(&SourceImage::from_bytes("a.png", png_bytes()))
        .unwrap();
    assert_eq!(pair.foreground().pixel(1, 1), Some([200, 100, 50, 255]));
}

#[cfg(unix)]
#[test]
fn failing_program_is_an_adapter_error() {
    let seg = CommandSegmenter::new("false");
    let err = seg
        .segment(&SourceImage::from_bytes("a.png", png_bytes()))
        .unwrap_err();
    assert!(matches!(err, SegmentationError::Adapter(_)));
}
