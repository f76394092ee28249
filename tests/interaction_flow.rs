//! Interaction flows through the pointer-event dispatcher: pairing,
//! selection toggling, the delete confirmation and teardown paths.

use pretty_assertions::assert_eq;

use boxlink::{
    AnchorHandle, BoundingBox, DeleteChoice, Diagram, EngineError, Point, PointerEvent,
    PointerTarget, Response, SelectionState,
};

fn click_box(diagram: &mut Diagram, id: boxlink::BoxId) -> Response {
    diagram
        .dispatch(PointerEvent::Click {
            at: Point::new(0.0, 0.0),
            target: PointerTarget::Box(id),
        })
        .unwrap()
}

fn click_segment(diagram: &mut Diagram, id: boxlink::ConnectorId) -> Response {
    diagram
        .dispatch(PointerEvent::Click {
            at: Point::new(0.0, 0.0),
            target: PointerTarget::Segment(id),
        })
        .unwrap()
}

fn secondary_double_press(diagram: &mut Diagram, id: boxlink::ConnectorId) -> Response {
    diagram
        .dispatch(PointerEvent::SecondaryDoublePress {
            at: Point::new(0.0, 0.0),
            target: PointerTarget::Segment(id),
        })
        .unwrap()
}

fn two_box_diagram() -> (Diagram, boxlink::BoxId, boxlink::BoxId) {
    let mut diagram = Diagram::new();
    let a = diagram.add_box(BoundingBox::new(0.0, 0.0, 100.0, 50.0));
    let b = diagram.add_box(BoundingBox::new(200.0, 150.0, 100.0, 50.0));
    (diagram, a, b)
}

#[test]
fn pairing_click_sequence_creates_a_connector() {
    let (mut diagram, a, b) = two_box_diagram();
    diagram.set_pairing_enabled(true);

    assert_eq!(click_box(&mut diagram, a), Response::SourceArmed(a));
    assert_eq!(diagram.pending_source(), Some(a));
    // The armed source is highlighted in the scene.
    let scene = diagram.scene();
    assert!(scene.boxes.iter().any(|sb| sb.id == a && sb.pending_source));

    let response = click_box(&mut diagram, b);
    let Response::ConnectorCreated(link) = response else {
        panic!("expected connector creation, got {:?}", response);
    };
    assert_eq!(diagram.pending_source(), None);
    assert_eq!(diagram.connector(link).unwrap().start_box(), a);
    assert_eq!(diagram.connector(link).unwrap().end_box(), b);
}

#[test]
fn clicking_the_armed_source_clears_it() {
    let (mut diagram, a, _) = two_box_diagram();
    diagram.set_pairing_enabled(true);

    click_box(&mut diagram, a);
    assert_eq!(click_box(&mut diagram, a), Response::SourceCleared);
    assert_eq!(diagram.pending_source(), None);
    assert_eq!(diagram.connector_count(), 0);
}

#[test]
fn box_clicks_ignored_outside_pairing_mode() {
    let (mut diagram, a, _) = two_box_diagram();
    assert_eq!(click_box(&mut diagram, a), Response::Ignored);
    assert_eq!(diagram.pending_source(), None);
}

#[test]
fn selection_toggle_is_a_two_cycle_across_moves() {
    let (mut diagram, _, b) = two_box_diagram();
    let a = diagram.scene().boxes[0].id;
    diagram.set_pairing_enabled(true);
    click_box(&mut diagram, a);
    let Response::ConnectorCreated(link) = click_box(&mut diagram, b) else {
        panic!("pairing did not complete");
    };
    let original = diagram.connector(link).unwrap().stroke().to_string();

    assert_eq!(
        click_segment(&mut diagram, link),
        Response::SelectionToggled(link)
    );
    assert!(diagram.connector(link).unwrap().is_selected());
    assert_ne!(diagram.connector(link).unwrap().stroke(), original);

    // The connector is rerouted between the two clicks.
    diagram.move_box(b, -40.0, 25.0).unwrap();

    click_segment(&mut diagram, link);
    assert!(!diagram.connector(link).unwrap().is_selected());
    assert_eq!(diagram.connector(link).unwrap().stroke(), original);
}

#[test]
fn cancelled_delete_mutates_nothing() {
    let (mut diagram, a, b) = two_box_diagram();
    let link = diagram.connect(a, b).unwrap();
    let before = diagram.scene();

    assert_eq!(
        secondary_double_press(&mut diagram, link),
        Response::DeleteRequested(link)
    );
    assert_eq!(
        diagram.connector(link).unwrap().state(),
        SelectionState::PendingDelete {
            was_selected: false
        }
    );
    assert!(!diagram.resolve_delete(link, DeleteChoice::Cancelled).unwrap());

    assert_eq!(diagram.scene(), before);
    assert_eq!(diagram.connector(link).unwrap().state(), SelectionState::Idle);
}

#[test]
fn confirmed_delete_removes_every_primitive() {
    let (mut diagram, a, b) = two_box_diagram();
    let link = diagram.connect(a, b).unwrap();

    secondary_double_press(&mut diagram, link);
    assert!(diagram.resolve_delete(link, DeleteChoice::Confirmed).unwrap());

    assert!(diagram.connector(link).is_none());
    assert!(diagram.scene().connectors.is_empty());
    // Subscriptions are gone too: a later move must not resurrect anything.
    diagram.move_box(a, 5.0, 5.0).unwrap();
    assert!(diagram.scene().connectors.is_empty());
}

#[test]
fn second_double_press_while_pending_is_ignored() {
    let (mut diagram, a, b) = two_box_diagram();
    let link = diagram.connect(a, b).unwrap();

    assert_eq!(
        secondary_double_press(&mut diagram, link),
        Response::DeleteRequested(link)
    );
    assert_eq!(secondary_double_press(&mut diagram, link), Response::Ignored);
}

#[test]
fn removing_a_box_tears_down_its_connectors() {
    let (mut diagram, a, b) = two_box_diagram();
    let c = diagram.add_box(BoundingBox::new(400.0, 0.0, 50.0, 50.0));
    let a_to_b = diagram.connect(a, b).unwrap();
    let b_to_c = diagram.connect(b, c).unwrap();
    let a_to_c = diagram.connect(a, c).unwrap();

    diagram.remove_box(b).unwrap();

    assert!(diagram.connector(a_to_b).is_none());
    assert!(diagram.connector(b_to_c).is_none());
    assert!(diagram.connector(a_to_c).is_some());
    assert_eq!(diagram.connector_count(), 1);
}

#[test]
fn events_against_a_torn_down_connector_fail() {
    let (mut diagram, a, b) = two_box_diagram();
    let link = diagram.connect(a, b).unwrap();
    secondary_double_press(&mut diagram, link);
    diagram.resolve_delete(link, DeleteChoice::Confirmed).unwrap();

    assert_eq!(
        diagram.dispatch(PointerEvent::Click {
            at: Point::new(0.0, 0.0),
            target: PointerTarget::Segment(link),
        }),
        Err(EngineError::UnknownConnector { id: link })
    );
}

#[test]
fn anchor_drag_responds_and_moves() {
    let (mut diagram, _, _) = two_box_diagram();
    let scene = diagram.scene();
    let (a, b) = (scene.boxes[0].id, scene.boxes[1].id);
    let link = diagram.connect(a, b).unwrap();

    let response = diagram
        .dispatch(PointerEvent::Drag {
            at: Point::new(40.0, 49.0),
            target: PointerTarget::Anchor(link, AnchorHandle::Start),
        })
        .unwrap();

    assert_eq!(response, Response::AnchorMoved(link));
    assert_eq!(
        diagram.connector(link).unwrap().start_anchor().position,
        Point::new(40.0, 50.0)
    );
}

#[test]
fn presses_and_box_drags_are_ignored() {
    let (mut diagram, a, b) = two_box_diagram();
    let link = diagram.connect(a, b).unwrap();

    let ignored = [
        PointerEvent::Press {
            at: Point::new(0.0, 0.0),
            target: PointerTarget::Segment(link),
        },
        PointerEvent::Drag {
            at: Point::new(10.0, 10.0),
            target: PointerTarget::Box(a),
        },
        PointerEvent::SecondaryDoublePress {
            at: Point::new(0.0, 0.0),
            target: PointerTarget::Box(b),
        },
    ];
    for event in ignored {
        assert_eq!(diagram.dispatch(event).unwrap(), Response::Ignored);
    }
}
