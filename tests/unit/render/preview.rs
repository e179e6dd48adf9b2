use super::*;
use crate::assets::decode::RasterImage;
use crate::foundation::core::Rgb8;
use crate::interaction::gesture::PointerEvent;
use crate::layers::model::LayerPatch;

fn pair() -> ImagePair {
    let bg = RasterImage::filled(40, 20, [10, 10, 10, 255]).unwrap();
    let fg = RasterImage::filled(40, 20, [0, 0, 0, 0]).unwrap();
    ImagePair::new(bg, fg)
}

fn fixed_box(w: f64, h: f64) -> impl FnMut(&TextLayer) -> Option<Size> {
    move |_| Some(Size::new(w, h))
}

#[test]
fn paint_list_is_background_layers_foreground() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    let b = s.add_layer();
    let scene = PreviewScene::build(&s, &pair());
    let items = scene.items();
    assert_eq!(items.len(), 4);
    assert!(matches!(items[0], PreviewItem::Background(c) if c.width == 40));
    assert!(matches!(&items[1], PreviewItem::Text(t) if t.layer.id == a));
    assert!(matches!(&items[2], PreviewItem::Text(t) if t.layer.id == b));
    assert!(matches!(items[3], PreviewItem::Foreground(_)));
}

#[test]
fn preview_text_carries_css_strings() {
    let mut s = EditorState::new();
    s.add_layer();
    s.update_selected(
        &LayerPatch::default()
            .rotation(45)
            .shadow_blur(6)
            .shadow_color(Rgb8::new(255, 0, 0)),
    );
    let scene = PreviewScene::build(&s, &pair());
    let t = scene.texts().next().unwrap();
    assert_eq!(t.font, "700 100px Arial");
    assert_eq!(t.color, "#FFFFFF");
    assert_eq!(t.text_shadow, "#FF0000 0px 0px 6px");
    assert_eq!(t.transform, "translate(-50%, -50%) rotate(45deg)");
    assert!(t.selected);
    assert!(!t.grabbing);
}

#[test]
fn dragged_layer_is_marked_grabbing() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    let b = s.add_layer();
    s.handle_pointer(PointerEvent::Down {
        layer: a,
        at: Point::ZERO,
    });
    let scene = PreviewScene::build(&s, &pair());
    let flags: Vec<_> = scene
        .texts()
        .map(|t| (t.layer.id, t.grabbing, t.selected))
        .collect();
    assert_eq!(flags, vec![(a, true, true), (b, false, false)]);
}

#[test]
fn hit_test_prefers_the_topmost_layer() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    let b = s.add_layer();
    let scene = PreviewScene::build(&s, &pair());
    let container = Size::new(400.0, 200.0);
    let hit = scene.hit_test(&mut fixed_box(100.0, 40.0), Point::new(200.0, 100.0), container);
    assert_eq!(hit, Some(b));

    s.remove_layer(b);
    let scene = PreviewScene::build(&s, &pair());
    let hit = scene.hit_test(&mut fixed_box(100.0, 40.0), Point::new(200.0, 100.0), container);
    assert_eq!(hit, Some(a));
}

#[test]
fn hit_test_misses_outside_the_box() {
    let mut s = EditorState::new();
    s.add_layer();
    let scene = PreviewScene::build(&s, &pair());
    let container = Size::new(400.0, 200.0);
    let mut m = fixed_box(100.0, 40.0);
    assert!(scene.hit_test(&mut m, Point::new(260.0, 100.0), container).is_none());
    assert!(scene.hit_test(&mut m, Point::new(200.0, 130.0), container).is_none());
    assert!(scene.hit_test(&mut m, Point::new(249.0, 119.0), container).is_some());
}

#[test]
fn hit_test_respects_rotation() {
    let mut s = EditorState::new();
    let id = s.add_layer();
    s.update_selected(&LayerPatch::default().rotation(90));
    let scene = PreviewScene::build(&s, &pair());
    let container = Size::new(400.0, 200.0);
    let mut m = fixed_box(100.0, 20.0);
    // Rotated a quarter turn, the wide box now stands upright.
    assert_eq!(
        scene.hit_test(&mut m, Point::new(200.0, 145.0), container),
        Some(id)
    );
    assert!(scene.hit_test(&mut m, Point::new(245.0, 100.0), container).is_none());
}

#[test]
fn unmeasurable_layers_are_never_hit() {
    let mut s = EditorState::new();
    s.add_layer();
    let scene = PreviewScene::build(&s, &pair());
    let mut none = |_: &TextLayer| -> Option<Size> { None };
    assert!(
        scene
            .hit_test(&mut none, Point::new(200.0, 100.0), Size::new(400.0, 200.0))
            .is_none()
    );
}

#[test]
fn fit_contain_keeps_aspect_without_upscaling() {
    let natural = Canvas {
        width: 2000,
        height: 1000,
    };
    assert_eq!(fit_contain(natural, Size::new(800.0, 800.0)), Size::new(800.0, 400.0));
    assert_eq!(fit_contain(natural, Size::new(4000.0, 300.0)), Size::new(600.0, 300.0));
    assert_eq!(
        fit_contain(natural, Size::new(5000.0, 5000.0)),
        Size::new(2000.0, 1000.0)
    );
    assert_eq!(fit_contain(natural, Size::ZERO), Size::ZERO);
}
