#![forbid(unsafe_code)]

//! Scripted demo session.
//!
//! Plays a list of [`Step`]s against a [`RecyclingList`] of cities, the way
//! a user would scroll, hover and drag the map. Page fetches run on worker
//! threads and come back over a channel; `Settle` waits for all of them.
//! Time is virtual: `Idle` advances the clock without sleeping.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use recyclist::{
    DataProvider, FetchResult, HitTarget, ListConfig, LoadRequest, PageQuery, RecyclingList,
    ScrollMetrics, Window,
};

use crate::city::City;
use crate::layer::CityLayer;
use crate::map::MapView;
use crate::surface::TextSurface;

/// Layout height of one list row.
pub const ITEM_HEIGHT: f64 = 20.0;

/// One scripted user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Scroll by this many rows; negative scrolls up.
    Scroll(f64),
    /// Pointer over the visible row at this position.
    Hover(usize),
    /// Pointer over the list's leading padding.
    HoverPadding,
    /// Pointer left the list.
    Leave,
    /// Drag the map by a fraction of its size.
    Pan(f64, f64),
    /// Zoom the map; below 1 zooms in.
    Zoom(f64),
    /// Let virtual time pass.
    Idle(Duration),
    /// Wait for every outstanding fetch.
    Settle,
}

/// The standard demo: load, scroll down, hover, scroll back, drag, zoom out.
#[must_use]
pub fn default_script(steps: usize, step_rows: f64) -> Vec<Step> {
    let mut script = vec![Step::Idle(Duration::ZERO), Step::Settle];
    for _ in 0..steps {
        script.push(Step::Scroll(step_rows));
        script.push(Step::Settle);
    }
    script.extend([Step::Hover(0), Step::Hover(0), Step::Hover(1), Step::Leave]);
    for _ in 0..steps {
        script.push(Step::Scroll(-step_rows));
    }
    for _ in 0..4 {
        script.push(Step::Pan(0.05, 0.0));
        script.push(Step::Idle(Duration::from_millis(40)));
    }
    script.extend([
        Step::Idle(Duration::from_millis(250)),
        Step::Settle,
        Step::Zoom(4.0),
        Step::Idle(Duration::from_millis(250)),
        Step::Settle,
    ]);
    for _ in 0..steps {
        script.push(Step::Scroll(step_rows));
        script.push(Step::Settle);
    }
    script.push(Step::HoverPadding);
    script
}

/// Session parameters.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub list: ListConfig,
    /// Visible rows.
    pub viewport_rows: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            list: ListConfig::new().with_capacity(8),
            viewport_rows: 5,
        }
    }
}

/// Counters collected over a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub pages: u32,
    pub refreshes: u32,
    pub failures: u32,
    pub records: usize,
    pub window: Window,
    pub nodes_created: usize,
    pub rewrites: u64,
    pub highlights: u32,
    pub coalesced_extents: u64,
    pub highlighted: Option<u32>,
}

enum Fetched {
    More(LoadRequest, FetchResult<Vec<City>>),
    Refresh(PageQuery, FetchResult<Vec<City>>),
}

pub struct Session {
    list: RecyclingList<City, TextSurface>,
    map: Rc<RefCell<MapView>>,
    layer: Arc<CityLayer>,
    tx: Sender<Fetched>,
    rx: Receiver<Fetched>,
    in_flight: usize,
    clock: Instant,
    scroll_top: f64,
    viewport: f64,
    report: Report,
}

impl Session {
    #[must_use]
    pub fn new(config: SessionConfig, layer: CityLayer) -> Self {
        let map = Rc::new(RefCell::new(MapView::home(config.list.quiescence)));
        let mut list = RecyclingList::new(config.list, TextSurface::new(ITEM_HEIGHT));
        {
            let on_hover = Rc::clone(&map);
            let on_leave = Rc::clone(&map);
            list.on_hover(move |city: &City| on_hover.borrow_mut().highlight(city.objectid))
                .on_leave(move || on_leave.borrow_mut().clear_highlight());
        }
        let (tx, rx) = mpsc::channel();
        let mut session = Self {
            list,
            map,
            layer: Arc::new(layer),
            tx,
            rx,
            in_flight: 0,
            clock: Instant::now(),
            scroll_top: 0.0,
            viewport: config.viewport_rows as f64 * ITEM_HEIGHT,
            report: Report::default(),
        };
        // The first query uses the home extent without waiting for a drag.
        let extent = session.map.borrow().extent();
        let query = session.list.change_viewport(Some(extent));
        session.spawn_refresh(query);
        session
    }

    #[must_use]
    pub fn list(&self) -> &RecyclingList<City, TextSurface> {
        &self.list
    }

    #[must_use]
    pub fn map(&self) -> std::cell::Ref<'_, MapView> {
        self.map.borrow()
    }

    #[must_use]
    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// The rendered list.
    #[must_use]
    pub fn frame(&self) -> Vec<String> {
        self.list.surface().render()
    }

    /// Play every step and return the counters.
    pub fn run(&mut self, script: &[Step]) -> Report {
        for step in script {
            self.step(step);
        }
        self.settle();
        self.report()
    }

    pub fn step(&mut self, step: &Step) {
        tracing::trace!(?step, "session step");
        match *step {
            Step::Scroll(rows) => self.scroll_by(rows),
            Step::Hover(row) => self.hover_row(row),
            Step::HoverPadding => {
                self.list.pointer_over(&[HitTarget::Padding]);
            }
            Step::Leave => self.list.pointer_leave(),
            Step::Pan(fx, fy) => self.map.borrow_mut().pan(fx, fy, self.clock),
            Step::Zoom(factor) => self.map.borrow_mut().zoom(factor, self.clock),
            Step::Idle(dt) => self.advance(dt),
            Step::Settle => self.settle(),
        }
    }

    #[must_use]
    pub fn report(&self) -> Report {
        let map = self.map.borrow();
        Report {
            records: self.list.records().len(),
            window: self.list.window(),
            nodes_created: self.list.pool().created(),
            rewrites: self.list.surface().rewrites(),
            highlights: map.highlight_count(),
            coalesced_extents: map.coalesced_changes(),
            highlighted: map.highlighted().map(|h| h.objectid),
            ..self.report.clone()
        }
    }

    fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(self.scroll_top, self.viewport, ITEM_HEIGHT)
    }

    fn scroll_by(&mut self, rows: f64) {
        let max_top = (self.list.content_height(ITEM_HEIGHT) - self.viewport).max(0.0);
        self.scroll_top = (self.scroll_top + rows * ITEM_HEIGHT).clamp(0.0, max_top);
        let outcome = self.list.on_scroll(self.metrics());
        if let Some(request) = outcome.load {
            self.spawn_load(request);
        }
    }

    fn hover_row(&mut self, row: usize) {
        let y = self.scroll_top + row as f64 * ITEM_HEIGHT;
        let index = (y / ITEM_HEIGHT).floor() as usize;
        let chain: Vec<HitTarget> = match self.list.pool().iter().find(|&(_, i)| i == index) {
            Some((node, _)) => vec![HitTarget::Field { column: 1 }, HitTarget::Node(node)],
            None => vec![HitTarget::Padding],
        };
        self.list.pointer_over(&chain);
    }

    fn advance(&mut self, dt: Duration) {
        self.clock += dt;
        let settled = self.map.borrow_mut().poll_extent(self.clock);
        if let Some(extent) = settled {
            tracing::debug!(?extent, "map extent settled");
            let query = self.list.change_viewport(Some(extent));
            self.spawn_refresh(query);
        }
    }

    fn spawn_refresh(&mut self, query: PageQuery) {
        let layer = Arc::clone(&self.layer);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let result = layer.fetch(&query);
            let _ = tx.send(Fetched::Refresh(query, result));
        });
    }

    fn spawn_load(&mut self, request: LoadRequest) {
        let layer = Arc::clone(&self.layer);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let result = request.fetch(&layer);
            let _ = tx.send(Fetched::More(request, result));
        });
    }

    /// Block until every outstanding fetch has been delivered.
    pub fn settle(&mut self) {
        while self.in_flight > 0 {
            let Ok(fetched) = self.rx.recv() else {
                break;
            };
            self.in_flight -= 1;
            self.deliver(fetched);
        }
    }

    fn deliver(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::More(request, result) => {
                self.report.pages += 1;
                if let Err(err) = self.list.complete_load(request, result) {
                    self.report.failures += 1;
                    tracing::info!(%err, "page failed, next scroll retries");
                }
            }
            Fetched::Refresh(query, result) => {
                self.report.refreshes += 1;
                match self.list.complete_refresh(&query, result) {
                    Ok(added) => {
                        self.scroll_top = 0.0;
                        tracing::info!(added, generation = query.generation, "list refreshed");
                    }
                    Err(err) => {
                        self.report.failures += 1;
                        tracing::info!(%err, "refresh failed, list kept");
                    }
                }
            }
        }
    }
}
