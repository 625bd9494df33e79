//! The worker side of the pipeline: drain the click queue, classify, and
//! fire the navigation chord.
//!
//! The worker is deliberately decoupled from the platform behind two small
//! traits: [`PointInspector`] resolves a screen point to a UI element plus
//! its owning top-level window class, and [`ParentNav`] performs the
//! navigate-to-parent side effect. On Windows these are [`crate::uia`] and
//! [`crate::input`]; the tests wire in scripted fakes and exercise the loop
//! end to end.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde::Serialize;

use crate::classify::{walk_ancestry, ProbeStep, UiNode, Verdict};
use crate::config::Settings;
use crate::errors::UpclickError;
use crate::monitor::DoubleClick;

/// A resolved hit test: the element under the point and the class name of
/// the top-level window that owns it.
pub struct Hit<N> {
    pub node: N,
    pub window_class: String,
}

/// Resolves screen points to UI elements.
pub trait PointInspector {
    type Node: UiNode;

    /// Hit-test the point. `Ok(None)` means no element (or no owning
    /// window) was found there; `Err` means the query itself failed. Both
    /// collapse to [`Verdict::NotTargetWindow`].
    fn hit_test(&mut self, x: i32, y: i32) -> Result<Option<Hit<Self::Node>>, UpclickError>;
}

/// Performs the "navigate to parent folder" side effect.
pub trait ParentNav {
    fn navigate_parent(&mut self) -> Result<(), UpclickError>;
}

/// Owned outcome of processing one double-click. Serializable for debug
/// logging and the probe tool; never stored across events.
#[derive(Debug, Clone, Serialize)]
pub struct ClickReport {
    pub x: i32,
    pub y: i32,
    pub verdict: Verdict,
    pub window_class: Option<String>,
    pub steps: Vec<ProbeStep>,
    pub navigated: bool,
}

impl ClickReport {
    fn not_target(click: DoubleClick, window_class: Option<String>) -> Self {
        Self {
            x: click.x,
            y: click.y,
            verdict: Verdict::NotTargetWindow,
            window_class,
            steps: Vec::new(),
            navigated: false,
        }
    }
}

/// Pure verdict derivation for one double-click: window scoping first, then
/// the ancestry walk. No side effects.
pub fn evaluate<N: UiNode>(
    click: DoubleClick,
    hit: Option<Hit<N>>,
    settings: &Settings,
) -> ClickReport {
    let Some(hit) = hit else {
        return ClickReport::not_target(click, None);
    };

    // Scoping is mandatory: never act over another application.
    if hit.window_class != settings.target_window_class {
        return ClickReport::not_target(click, Some(hit.window_class));
    }

    let (verdict, steps) = walk_ancestry(hit.node, settings.max_walk_depth, &settings.content_types);
    ClickReport {
        x: click.x,
        y: click.y,
        verdict,
        window_class: Some(hit.window_class),
        steps,
        navigated: false,
    }
}

/// Sequential worker: one event at a time, strictly in queue order.
pub struct Dispatcher<I, K> {
    inspector: I,
    keys: K,
    settings: Arc<Settings>,
    rx: Receiver<DoubleClick>,
    shutdown: Arc<AtomicBool>,
}

impl<I, K> Dispatcher<I, K>
where
    I: PointInspector,
    K: ParentNav,
{
    pub fn new(
        inspector: I,
        keys: K,
        settings: Arc<Settings>,
        rx: Receiver<DoubleClick>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            inspector,
            keys,
            settings,
            rx,
            shutdown,
        }
    }

    /// Run until the shutdown flag is set or the producer goes away. The
    /// dequeue wait times out periodically so the flag is always observed;
    /// an in-flight event finishes before the loop exits.
    pub fn run(mut self) {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            match self.rx.recv_timeout(self.settings.poll_interval) {
                Ok(click) => {
                    self.process(click);
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    /// Classify one double-click and fire the chord on a blank verdict.
    /// Every failure is contained here; a bad event never stops the loop.
    pub fn process(&mut self, click: DoubleClick) -> ClickReport {
        let hit = match self.inspector.hit_test(click.x, click.y) {
            Ok(hit) => hit,
            Err(err) => {
                log::debug!("hit test failed at ({}, {}): {err}", click.x, click.y);
                None
            }
        };

        let mut report = evaluate(click, hit, &self.settings);

        if self.settings.debug {
            for step in &report.steps {
                log::debug!(
                    "  [{}] type={} name={:?} selectable={}",
                    step.depth,
                    step.control_type,
                    step.name,
                    step.selectable
                );
            }
        }

        if report.verdict == Verdict::Blank {
            match self.keys.navigate_parent() {
                Ok(()) => report.navigated = true,
                Err(err) => log::warn!("parent navigation chord failed: {err}"),
            }
        }

        log::debug!(
            "double-click at ({}, {}): {:?}{}",
            report.x,
            report.y,
            report.verdict,
            if report.navigated { ", navigated" } else { "" }
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::click_channel;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::sync::atomic::AtomicUsize;

    struct FakeNode {
        selectable: bool,
        control_type: &'static str,
        parent: Option<Rc<FakeNode>>,
    }

    impl UiNode for Rc<FakeNode> {
        fn is_selectable(&self) -> bool {
            self.selectable
        }
        fn control_type(&self) -> &'static str {
            self.control_type
        }
        fn name(&self) -> String {
            String::new()
        }
        fn parent(&self) -> Option<Self> {
            self.parent.clone()
        }
    }

    /// Leaf-to-root chain builder.
    fn chain(levels: &[(bool, &'static str)]) -> Rc<FakeNode> {
        let mut parent: Option<Rc<FakeNode>> = None;
        for &(selectable, control_type) in levels.iter().rev() {
            parent = Some(Rc::new(FakeNode {
                selectable,
                control_type,
                parent,
            }));
        }
        parent.expect("chain must not be empty")
    }

    enum Scripted {
        Hit(&'static [(bool, &'static str)], &'static str),
        Miss,
        Fail,
    }

    /// Replays a fixed sequence of hit-test outcomes.
    struct ScriptedInspector {
        script: VecDeque<Scripted>,
    }

    impl ScriptedInspector {
        fn new(script: Vec<Scripted>) -> Self {
            Self {
                script: script.into(),
            }
        }
    }

    impl PointInspector for ScriptedInspector {
        type Node = Rc<FakeNode>;

        fn hit_test(
            &mut self,
            _x: i32,
            _y: i32,
        ) -> Result<Option<Hit<Self::Node>>, UpclickError> {
            match self.script.pop_front() {
                Some(Scripted::Hit(levels, class)) => Ok(Some(Hit {
                    node: chain(levels),
                    window_class: class.to_owned(),
                })),
                Some(Scripted::Miss) | None => Ok(None),
                Some(Scripted::Fail) => {
                    Err(UpclickError::TreeError("element went stale".into()))
                }
            }
        }
    }

    /// Counts chord sends; optionally fails every attempt.
    struct CountingNav {
        sent: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CountingNav {
        fn new(sent: Arc<AtomicUsize>) -> Self {
            Self { sent, fail: false }
        }
    }

    impl ParentNav for CountingNav {
        fn navigate_parent(&mut self) -> Result<(), UpclickError> {
            if self.fail {
                return Err(UpclickError::InputError("injected 0 of 4 events".into()));
            }
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn dispatcher(
        script: Vec<Scripted>,
        sent: Arc<AtomicUsize>,
    ) -> (
        Dispatcher<ScriptedInspector, CountingNav>,
        crossbeam_channel::Sender<DoubleClick>,
        Arc<AtomicBool>,
    ) {
        let (tx, rx) = click_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let d = Dispatcher::new(
            ScriptedInspector::new(script),
            CountingNav::new(sent),
            Arc::new(Settings::default()),
            rx,
            shutdown.clone(),
        );
        (d, tx, shutdown)
    }

    const EXPLORER: &str = "CabinetWClass";
    const BACKGROUND: &[(bool, &'static str)] =
        &[(false, "List"), (false, "Pane"), (false, "Window")];
    const FILE_ROW: &[(bool, &'static str)] = &[(false, "Custom"), (true, "ListItem")];

    #[test]
    fn test_blank_click_in_explorer_navigates_once() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (mut d, _tx, _stop) =
            dispatcher(vec![Scripted::Hit(BACKGROUND, EXPLORER)], sent.clone());

        let report = d.process(DoubleClick { x: 100, y: 200 });
        assert_eq!(report.verdict, Verdict::Blank);
        assert!(report.navigated);
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_content_click_sends_nothing() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (mut d, _tx, _stop) =
            dispatcher(vec![Scripted::Hit(FILE_ROW, EXPLORER)], sent.clone());

        let report = d.process(DoubleClick { x: 100, y: 200 });
        assert_eq!(report.verdict, Verdict::Content);
        assert!(!report.navigated);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_other_window_class_is_ignored_even_when_blank() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (mut d, _tx, _stop) =
            dispatcher(vec![Scripted::Hit(BACKGROUND, "Notepad")], sent.clone());

        let report = d.process(DoubleClick { x: 100, y: 200 });
        assert_eq!(report.verdict, Verdict::NotTargetWindow);
        assert_eq!(report.window_class.as_deref(), Some("Notepad"));
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_element_is_not_target() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (mut d, _tx, _stop) = dispatcher(vec![Scripted::Miss], sent.clone());

        let report = d.process(DoubleClick { x: 0, y: 0 });
        assert_eq!(report.verdict, Verdict::NotTargetWindow);
        assert!(report.steps.is_empty());
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_hit_test_failure_degrades_to_not_target() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (mut d, _tx, _stop) = dispatcher(vec![Scripted::Fail], sent.clone());

        let report = d.process(DoubleClick { x: 0, y: 0 });
        assert_eq!(report.verdict, Verdict::NotTargetWindow);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failed_event_does_not_stop_processing() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (mut d, _tx, _stop) = dispatcher(
            vec![Scripted::Fail, Scripted::Hit(BACKGROUND, EXPLORER)],
            sent.clone(),
        );

        d.process(DoubleClick { x: 0, y: 0 });
        let report = d.process(DoubleClick { x: 1, y: 1 });
        assert_eq!(report.verdict, Verdict::Blank);
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_chord_failure_leaves_navigated_false() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = click_channel();
        drop(tx);
        let mut nav = CountingNav::new(sent.clone());
        nav.fail = true;
        let mut d = Dispatcher::new(
            ScriptedInspector::new(vec![Scripted::Hit(BACKGROUND, EXPLORER)]),
            nav,
            Arc::new(Settings::default()),
            rx,
            Arc::new(AtomicBool::new(false)),
        );

        let report = d.process(DoubleClick { x: 0, y: 0 });
        assert_eq!(report.verdict, Verdict::Blank);
        assert!(!report.navigated);
        assert_eq!(sent.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_run_drains_in_order_and_stops_on_disconnect() {
        // List item first, then background: exactly one navigation, from the
        // second event.
        let sent = Arc::new(AtomicUsize::new(0));
        let (d, tx, _stop) = dispatcher(
            vec![
                Scripted::Hit(FILE_ROW, EXPLORER),
                Scripted::Hit(BACKGROUND, EXPLORER),
            ],
            sent.clone(),
        );

        tx.send(DoubleClick { x: 10, y: 10 }).unwrap();
        tx.send(DoubleClick { x: 20, y: 20 }).unwrap();
        drop(tx);

        d.run();
        assert_eq!(sent.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_run_observes_shutdown_flag() {
        let sent = Arc::new(AtomicUsize::new(0));
        let (d, tx, stop) = dispatcher(vec![], sent);

        stop.store(true, Ordering::SeqCst);
        let handle = std::thread::spawn(move || d.run());
        handle.join().unwrap();
        drop(tx);
    }

    #[test]
    fn test_report_serializes() {
        let report = ClickReport {
            x: 10,
            y: 20,
            verdict: Verdict::Blank,
            window_class: Some("CabinetWClass".into()),
            steps: vec![ProbeStep {
                depth: 0,
                control_type: "Pane".into(),
                name: String::new(),
                selectable: false,
            }],
            navigated: true,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"verdict\":\"Blank\""));
        assert!(json.contains("\"navigated\":true"));
        assert!(json.contains("CabinetWClass"));
    }
}
