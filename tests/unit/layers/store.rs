use super::*;

#[test]
fn add_layer_yields_unique_ids_and_selects_the_new_layer() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    let b = s.add_layer();
    assert_ne!(a, b);
    assert_eq!(s.selected_id(), Some(b));
    assert_eq!(s.len(), 2);
    assert_eq!(s.layers()[0].id, a);
    assert_eq!(s.layers()[1].id, b);
}

#[test]
fn ids_are_not_reused_after_removal() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    let b = s.add_layer();
    assert!(s.remove_layer(b));
    let c = s.add_layer();
    assert_ne!(c, a);
    assert_ne!(c, b);
}

#[test]
fn removing_the_selected_layer_clears_selection() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    assert!(s.remove_layer(a));
    assert_eq!(s.selected_id(), None);
    assert!(s.selected().is_none());
    assert!(s.is_empty());
}

#[test]
fn removing_another_layer_keeps_selection_and_order() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    let b = s.add_layer();
    let c = s.add_layer();
    assert!(s.select_layer(a));
    assert!(s.remove_layer(b));
    assert_eq!(s.selected_id(), Some(a));
    let ids: Vec<_> = s.layers().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn missing_ids_are_no_ops() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    assert!(!s.remove_layer(LayerId(999)));
    assert!(!s.select_layer(LayerId(999)));
    assert_eq!(s.selected_id(), Some(a));
    assert_eq!(s.len(), 1);
}

#[test]
fn update_selected_requires_a_selection() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    s.deselect();
    assert!(!s.update_selected(&LayerPatch::default().text("ignored")));
    assert_eq!(s.layer(a).unwrap().text, "New Text");

    s.select_layer(a);
    assert!(s.update_selected(&LayerPatch::default().text("HELLO")));
    assert_eq!(s.layer(a).unwrap().text, "HELLO");
}

#[test]
fn update_selected_clamps_positions() {
    let mut s = EditorState::new();
    s.add_layer();
    for (x, y) in [(-50.0, 250.0), (0.0, 100.0), (33.3, 66.6), (1e9, -1e9)] {
        s.update_selected(&LayerPatch::default().position(x, y));
        let l = s.selected().unwrap();
        assert_eq!(l.x, x.clamp(0.0, 100.0));
        assert_eq!(l.y, y.clamp(0.0, 100.0));
    }
}

#[test]
fn update_touches_only_the_selected_layer() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    let b = s.add_layer();
    s.update_selected(&LayerPatch::default().font_size(42));
    assert_eq!(s.layer(a).unwrap().font_size, 100);
    assert_eq!(s.layer(b).unwrap().font_size, 42);
}

#[test]
fn layer_entries_label_and_mark_selection() {
    let mut s = EditorState::new();
    let a = s.add_layer();
    s.update_selected(&LayerPatch::default().text(""));
    let b = s.add_layer();
    let entries = s.layer_entries();
    assert_eq!(
        entries,
        vec![
            LayerEntry {
                id: a,
                label: "Empty Text".into(),
                selected: false,
            },
            LayerEntry {
                id: b,
                label: "New Text".into(),
                selected: true,
            },
        ]
    );
}

#[test]
fn from_layers_reassigns_ids_and_sanitizes() {
    let imported = vec![
        TextLayer {
            id: LayerId(5),
            x: 140.0,
            ..TextLayer::default()
        },
        TextLayer {
            id: LayerId(5),
            rotation: 400,
            ..TextLayer::default()
        },
    ];
    let mut s = EditorState::from_layers(imported);
    assert_eq!(s.len(), 2);
    assert_ne!(s.layers()[0].id, s.layers()[1].id);
    assert_eq!(s.layers()[0].x, 100.0);
    assert_eq!(s.layers()[1].rotation, 40);
    assert_eq!(s.selected_id(), None);

    let fresh = s.add_layer();
    assert!(s.layers()[..2].iter().all(|l| l.id != fresh));
}
