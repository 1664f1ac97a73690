use std::collections::HashMap;

use egui::{pos2, vec2, Event, Modifiers, PointerButton, Pos2, RawInput, Rect};
use egui_dnd_grid::{
    Atom, DragDropResponse, DragIndices, DragStartEvent, GridConfig, OrderStore, ReorderGrid,
};

type Seen = Vec<(&'static str, bool, bool)>;

/// Handle rect and card rect of every card drawn in place during the last frame.
type Rects = HashMap<&'static str, (Rect, Rect)>;

fn sources() -> Vec<&'static str> {
    vec!["hacker-news", "github", "v2ex", "weibo"]
}

fn input(time: f64, width: f32, events: Vec<Event>) -> RawInput {
    RawInput {
        screen_rect: Some(Rect::from_min_size(Pos2::ZERO, vec2(width, 600.0))),
        time: Some(time),
        focused: true,
        events,
        ..Default::default()
    }
}

fn button(pos: Pos2, pressed: bool) -> Event {
    Event::PointerButton {
        pos,
        button: PointerButton::Primary,
        pressed,
        modifiers: Modifiers::NONE,
    }
}

/// Runs one egui frame with the grid in a central panel, recording every card handed to the card
/// renderer as `(item, is_overlay, is_dragging)`. Returns the last response that was not
/// [`DragDropResponse::NoDrag`] if egui ran more than one pass.
fn run(
    ctx: &egui::Context,
    raw_input: RawInput,
    grid: &mut ReorderGrid<&'static str>,
    store: &mut Atom<Vec<&'static str>>,
    seen: &mut Seen,
    rects: &mut Rects,
) -> DragDropResponse<&'static str> {
    let mut response = DragDropResponse::NoDrag;
    let _ = ctx.run(raw_input, |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            let pass = grid.ui(ui, store, |ui, mut card| {
                let item = *card.item();
                let card_rect = ui.max_rect();
                seen.push((item, card.is_overlay(), card.is_dragging()));
                let handle = card.handle(ui, |ui| {
                    ui.label("::");
                });
                ui.label(item);
                if !card.is_overlay() {
                    rects.insert(item, (handle.rect, card_rect));
                }
            });
            if !matches!(pass, DragDropResponse::NoDrag) {
                response = pass;
            }
        });
    });
    response
}

fn run_frame(
    ctx: &egui::Context,
    time: f64,
    grid: &mut ReorderGrid<&'static str>,
    store: &mut Atom<Vec<&'static str>>,
    seen: &mut Seen,
) -> DragDropResponse<&'static str> {
    let raw_input = RawInput {
        time: Some(time),
        focused: true,
        ..Default::default()
    };
    run(ctx, raw_input, grid, store, seen, &mut Rects::new())
}

/// Mounts the grid and lets the entrance and the first measurements settle.
fn settle(
    ctx: &egui::Context,
    grid: &mut ReorderGrid<&'static str>,
    store: &mut Atom<Vec<&'static str>>,
    width: f32,
) -> Rects {
    let mut rects = Rects::new();
    for time in [0.0, 1.0, 2.0, 3.0, 4.0, 5.0] {
        rects.clear();
        run(ctx, input(time, width, vec![]), grid, store, &mut Seen::new(), &mut rects);
    }
    rects
}

#[test]
fn idle_grid_draws_every_card_once_without_overlay() {
    let ctx = egui::Context::default();
    let mut grid = ReorderGrid::default();
    let mut store = Atom::new(sources());
    let mut seen = Seen::new();

    let response = run_frame(&ctx, 0.0, &mut grid, &mut store, &mut seen);

    assert_eq!(response, DragDropResponse::NoDrag);
    for source in sources() {
        assert!(seen.contains(&(source, false, false)), "{source} not drawn");
    }
    assert!(seen.iter().all(|(_, is_overlay, _)| !is_overlay));
    assert_eq!(store.current(), sources().as_slice());
}

#[test]
fn active_card_gets_placeholder_and_overlay() {
    let ctx = egui::Context::default();
    let mut grid = ReorderGrid::default();
    let mut store = Atom::new(sources());
    let mut seen = Seen::new();

    run_frame(&ctx, 0.0, &mut grid, &mut store, &mut seen);
    grid.on_drag_start(DragStartEvent {
        active: "github",
        index: 1,
        pointer: pos2(400.0, 50.0),
        rect: Rect::from_min_size(pos2(380.0, 10.0), vec2(350.0, 120.0)),
    });
    seen.clear();

    let response = run_frame(&ctx, 0.2, &mut grid, &mut store, &mut seen);

    assert!(matches!(
        response,
        DragDropResponse::CurrentDrag {
            active: "github",
            ..
        }
    ));
    assert!(seen.contains(&("github", false, true)));
    assert!(seen.contains(&("github", true, true)));
    assert!(seen.contains(&("v2ex", false, false)));
    assert_eq!(grid.active_id(), Some(&"github"));
}

#[test]
fn cancelled_drag_settles_and_hides_overlay() {
    let ctx = egui::Context::default();
    let mut grid = ReorderGrid::default();
    let mut store = Atom::new(sources());
    let mut seen = Seen::new();

    run_frame(&ctx, 0.0, &mut grid, &mut store, &mut seen);
    grid.on_drag_start(DragStartEvent {
        active: "v2ex",
        index: 2,
        pointer: pos2(20.0, 200.0),
        rect: Rect::from_min_size(pos2(10.0, 190.0), vec2(350.0, 120.0)),
    });
    assert_eq!(grid.on_drag_cancel(), DragDropResponse::Cancelled);
    assert_eq!(grid.active_id(), None);

    // the overlay glides back during the drop animation, then disappears
    run_frame(&ctx, 1.0, &mut grid, &mut store, &mut seen);
    assert!(grid.is_overlay_visible());
    run_frame(&ctx, 2.0, &mut grid, &mut store, &mut seen);
    assert!(!grid.is_overlay_visible());

    assert_eq!(store.current(), sources().as_slice());
    assert_eq!(store.version(), 0);
}

#[test]
fn pressing_a_handle_and_releasing_over_another_card_reorders() {
    let ctx = egui::Context::default();
    let mut grid = ReorderGrid::default();
    let mut store = Atom::new(sources());
    let mut seen = Seen::new();
    let mut rects = settle(&ctx, &mut grid, &mut store, 800.0);

    let (handle, card) = rects["hacker-news"];
    let (_, target) = rects["v2ex"];
    let grab = handle.center();
    let drop_at = grab + (target.min - card.min);

    let mut frame = |time: f64, events: Vec<Event>| {
        run(&ctx, input(time, 800.0, events), &mut grid, &mut store, &mut seen, &mut rects)
    };

    assert_eq!(frame(6.0, vec![Event::PointerMoved(grab)]), DragDropResponse::NoDrag);
    assert_eq!(
        frame(6.1, vec![button(grab, true)]),
        DragDropResponse::CurrentDrag {
            active: "hacker-news",
            over: Some("hacker-news")
        }
    );
    assert_eq!(
        frame(6.2, vec![Event::PointerMoved(drop_at)]),
        DragDropResponse::CurrentDrag {
            active: "hacker-news",
            over: Some("v2ex")
        }
    );
    assert_eq!(
        frame(6.3, vec![button(drop_at, false)]),
        DragDropResponse::Completed(DragIndices {
            source: 0,
            target: 2
        })
    );

    assert_eq!(
        store.current(),
        ["github", "v2ex", "hacker-news", "weibo"].as_slice()
    );
    assert_eq!(store.version(), 1);
    assert!(seen.contains(&("hacker-news", true, true)));
    assert_eq!(grid.active_id(), None);
}

#[test]
fn touch_press_uses_touch_sensor_when_mouse_is_disabled() {
    let ctx = egui::Context::default();
    let mut config = GridConfig::default();
    config.sensors.mouse.enabled = false;
    let mut grid = ReorderGrid::new(config);
    let mut store = Atom::new(sources());
    let mut seen = Seen::new();
    let mut rects = settle(&ctx, &mut grid, &mut store, 800.0);

    let grab = rects["github"].0.center();
    let touch = |phase| Event::Touch {
        device_id: egui::TouchDeviceId(0),
        id: egui::TouchId(0),
        phase,
        pos: grab,
        force: None,
    };

    let mut frame = |time: f64, events: Vec<Event>| {
        run(&ctx, input(time, 800.0, events), &mut grid, &mut store, &mut seen, &mut rects)
    };

    // a mouse click on the handle is ignored
    frame(6.0, vec![Event::PointerMoved(grab)]);
    assert_eq!(frame(6.1, vec![button(grab, true)]), DragDropResponse::NoDrag);
    assert_eq!(frame(6.2, vec![button(grab, false)]), DragDropResponse::NoDrag);

    // the same press made with a finger starts a drag
    assert_eq!(
        frame(
            6.3,
            vec![
                touch(egui::TouchPhase::Start),
                Event::PointerMoved(grab),
                button(grab, true),
            ]
        ),
        DragDropResponse::CurrentDrag {
            active: "github",
            over: Some("github")
        }
    );
    assert_eq!(grid.active_id(), Some(&"github"));
    assert_eq!(store.current(), sources().as_slice());
}

#[test]
fn dragging_in_a_panel_narrower_than_a_column_does_not_panic() {
    let ctx = egui::Context::default();
    let mut grid = ReorderGrid::default();
    let mut store = Atom::new(sources());
    let mut seen = Seen::new();
    let mut rects = settle(&ctx, &mut grid, &mut store, 20.0);

    let (_, card) = rects["hacker-news"];
    grid.on_drag_start(DragStartEvent {
        active: "hacker-news",
        index: 0,
        pointer: card.center(),
        rect: card,
    });
    grid.on_drag_over(Some("v2ex"));

    for time in [6.0, 6.1, 6.2] {
        let response = run(
            &ctx,
            input(time, 20.0, vec![]),
            &mut grid,
            &mut store,
            &mut seen,
            &mut rects,
        );
        assert!(matches!(
            response,
            DragDropResponse::CurrentDrag {
                active: "hacker-news",
                ..
            }
        ));
    }
    assert!(seen.contains(&("hacker-news", true, true)));
    for (handle, card) in rects.values() {
        assert!(handle.is_finite() && card.is_finite());
        assert!(card.width() >= 1.0);
    }
    assert_eq!(store.current(), sources().as_slice());
}
