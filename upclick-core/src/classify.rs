//! Content-vs-blank classification.
//!
//! The heuristic: walk up the ancestor chain from the element under the
//! click, at most [`crate::config::MAX_WALK_DEPTH`] generations. An element
//! that the platform itself considers individually selectable (the
//! selection-item pattern) is content, full stop -- a file row, a drive
//! icon, a tree node. A short fixed list of control types catches elements
//! that are visibly content but whose implementation never exposes the
//! pattern (plain text, images, edit fields). Anything that survives the
//! whole walk is blank canvas.
//!
//! The walk is written against the small [`UiNode`] trait rather than UIA
//! directly, so the live element wrapper in [`crate::uia`] and the fakes in
//! the tests run the identical algorithm.

use serde::Serialize;

/// Outcome of classifying one double-click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// The click landed on a file, folder, icon, row, or other concrete item.
    Content,
    /// The click landed on empty canvas; navigation should fire.
    Blank,
    /// The click was outside the target application, or the element could
    /// not be resolved at all. Always means "do nothing".
    NotTargetWindow,
}

/// What the classifier needs from a UI element.
///
/// Implementations hand out parents as fresh values; a node is only valid
/// for the classification pass that produced it and is never cached across
/// events.
pub trait UiNode: Sized {
    /// Does the platform expose the selection-item behavior on this element?
    fn is_selectable(&self) -> bool;

    /// The element's structural type name, e.g. `"ListItem"` or `"Pane"`.
    fn control_type(&self) -> &'static str;

    /// Display name, for diagnostics only.
    fn name(&self) -> String;

    /// The element's parent in the control tree, if it has one.
    fn parent(&self) -> Option<Self>;
}

/// One generation's observation during the walk. Kept for debug logging and
/// the probe tool.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeStep {
    pub depth: usize,
    pub control_type: String,
    pub name: String,
    pub selectable: bool,
}

/// Walk up from `start` and decide [`Verdict::Content`] or [`Verdict::Blank`].
///
/// The probe order per generation is fixed: selection capability first, type
/// list second. The depth cap bounds worst-case latency and guards against
/// malformed (cyclic) ancestor chains.
pub fn walk_ancestry<N: UiNode>(
    start: N,
    max_depth: usize,
    content_types: &[String],
) -> (Verdict, Vec<ProbeStep>) {
    let mut steps = Vec::with_capacity(max_depth);
    let mut current = Some(start);

    for depth in 0..max_depth {
        let Some(node) = current else { break };

        let selectable = node.is_selectable();
        let control_type = node.control_type();
        steps.push(ProbeStep {
            depth,
            control_type: control_type.to_owned(),
            name: node.name(),
            selectable,
        });

        if selectable {
            return (Verdict::Content, steps);
        }
        if content_types.iter().any(|t| t == control_type) {
            return (Verdict::Content, steps);
        }

        current = node.parent();
    }

    (Verdict::Blank, steps)
}
