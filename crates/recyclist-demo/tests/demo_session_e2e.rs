//! End-to-end demo sessions: scripted scrolling, map drags, injected
//! provider failures and latency.

use std::time::Duration;

use proptest::prelude::*;
use recyclist::ListConfig;
use recyclist_demo::layer::CityLayer;
use recyclist_demo::session::{Session, SessionConfig, Step, default_script};

fn config(capacity: usize, rows: usize) -> SessionConfig {
    SessionConfig {
        list: ListConfig::new().with_capacity(capacity),
        viewport_rows: rows,
    }
}

fn scroll_until_exhausted(session: &mut Session) {
    for _ in 0..60 {
        if session.list().is_exhausted() {
            return;
        }
        session.step(&Step::Scroll(4.0));
        session.settle();
    }
}

#[test]
fn failing_provider_still_delivers_every_city() {
    let layer = CityLayer::embedded()
        .expect("bundled data")
        .with_fail_every(3);
    let mut session = Session::new(config(6, 4), layer);
    session.settle();
    scroll_until_exhausted(&mut session);

    let report = session.report();
    assert_eq!(report.records, 21);
    assert!(report.failures >= 1);
    assert!(!session.list().is_loading());

    let ids: Vec<u32> = session
        .list()
        .records()
        .iter()
        .map(|c| c.objectid)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len(), "a city was appended twice");
}

#[test]
fn slow_provider_with_scrolls_in_flight() {
    let layer = CityLayer::embedded()
        .expect("bundled data")
        .with_latency(Duration::from_millis(5));
    let mut session = Session::new(config(4, 3), layer);
    session.settle();
    // Several scrolls before the page arrives issue a single load.
    for _ in 0..10 {
        session.step(&Step::Scroll(3.0));
    }
    assert!(session.list().is_loading());
    session.settle();
    let report = session.report();
    assert_eq!(report.pages, 1);
    assert!(report.window.len() <= 4);
}

#[test]
fn frame_shows_offset_marker_after_scrolling() {
    let layer = CityLayer::embedded().expect("bundled data");
    let mut session = Session::new(config(5, 3), layer);
    session.settle();
    session.step(&Step::Scroll(2.0));
    session.step(&Step::Scroll(2.0));
    let frame = session.frame();
    assert!(frame[1].contains("above"), "frame: {frame:#?}");
    assert_eq!(frame.len(), 2 + 5);
}

#[test]
fn zooming_out_refreshes_with_more_cities() {
    let layer = CityLayer::embedded().expect("bundled data");
    let mut session = Session::new(config(6, 4), layer);
    session.settle();
    session.step(&Step::Zoom(30.0));
    session.step(&Step::Idle(Duration::from_millis(250)));
    session.settle();
    scroll_until_exhausted(&mut session);
    assert!(session.report().records > 21);
    assert_eq!(session.report().refreshes, 2);
}

#[test]
fn default_script_ends_without_highlight() {
    let layer = CityLayer::embedded().expect("bundled data");
    let mut session = Session::new(config(8, 5), layer);
    let report = session.run(&default_script(6, 2.0));
    assert_eq!(report.highlighted, None);
    assert!(report.highlights >= 2);
    assert!(report.coalesced_extents >= 3);
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => (-6.0f64..6.0).prop_map(Step::Scroll),
        2 => (0usize..6).prop_map(Step::Hover),
        1 => Just(Step::Leave),
        1 => (-0.2f64..0.2, -0.2f64..0.2).prop_map(|(x, y)| Step::Pan(x, y)),
        1 => (0.5f64..3.0).prop_map(Step::Zoom),
        2 => (0u64..400).prop_map(|ms| Step::Idle(Duration::from_millis(ms))),
        2 => Just(Step::Settle),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_sessions_keep_the_pool_bounded(
        capacity in 1usize..8,
        rows in 1usize..6,
        steps in prop::collection::vec(step_strategy(), 1..40),
    ) {
        let layer = CityLayer::embedded().expect("bundled data");
        let mut session = Session::new(config(capacity, rows), layer);
        for step in &steps {
            session.step(step);
            let list = session.list();
            prop_assert!(list.window().len() <= capacity);
            prop_assert!(list.pool().created() <= capacity);
            prop_assert!(list.window().end() <= list.records().len());
            let bound: Vec<usize> = list.pool().iter().map(|(_, i)| i).collect();
            prop_assert_eq!(bound, list.window().range().collect::<Vec<_>>());
        }
        session.settle();
        prop_assert!(!session.list().is_loading());
    }
}
