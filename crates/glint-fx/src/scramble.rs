#![forbid(unsafe_code)]

//! Text scramble transition.
//!
//! [`ScrambleText::set_text`] morphs the text of a node into a new string.
//! Every grapheme position gets a reveal window `[start, end)` in frames:
//! before `start` it shows the old grapheme, inside the window a filler
//! glyph that flickers, and from `end` on the new grapheme for good.
//!
//! The first frame is written synchronously; later frames run on the host's
//! frame clock, one per tick. A second `set_text` on the same node cancels
//! the first run before writing anything, and the first run's signal is
//! abandoned rather than resolved.
//!
//! # Invariants
//!
//! 1. The final text equals the requested text.
//! 2. A position never changes after it settles.
//! 3. The completion signal resolves exactly once, or never when superseded.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use glint_core::signal::{CompletionSignal, Resolver, completion};
use glint_render::NodeId;
use glint_runtime::{FxHost, RunHandle};
use rand::{Rng, RngCore};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::{DEFAULT_FILLER, ScrambleConfig};

const KIND: &str = "scramble";

/// One grapheme position of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Old grapheme, empty past the end of the old text.
    pub from: String,
    /// New grapheme, empty past the end of the new text.
    pub to: String,
    /// First frame showing filler.
    pub start: u32,
    /// First frame showing `to`. Never less than `start`.
    pub end: u32,
    /// Current filler glyph; unset until the window opens.
    pub glyph: Option<char>,
}

/// What a slot shows on a given frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit<'a> {
    From(&'a str),
    Filler(char),
    To(&'a str),
}

impl Emit<'_> {
    /// Whether the slot has settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::To(_))
    }

    fn write(&self, out: &mut String) {
        match self {
            Self::From(s) | Self::To(s) => out.push_str(s),
            Self::Filler(c) => out.push(*c),
        }
    }
}

impl Slot {
    /// Produce this slot's output for `frame`, redrawing the filler glyph
    /// when unset or with probability `redraw`.
    pub fn emit(
        &mut self,
        frame: u32,
        rng: &mut dyn RngCore,
        filler: &[char],
        redraw: f32,
    ) -> Emit<'_> {
        if frame >= self.end {
            return Emit::To(&self.to);
        }
        if frame < self.start {
            return Emit::From(&self.from);
        }
        let glyph = match self.glyph {
            Some(glyph) if rng.random::<f32>() >= redraw => glyph,
            _ => {
                let glyph = pick(rng, filler);
                self.glyph = Some(glyph);
                glyph
            }
        };
        Emit::Filler(glyph)
    }
}

fn pick(rng: &mut dyn RngCore, filler: &[char]) -> char {
    match filler.len() {
        0 => ' ',
        len => filler[rng.random_range(0..len)],
    }
}

fn below(rng: &mut dyn RngCore, bound: u32) -> u32 {
    if bound == 0 { 0 } else { rng.random_range(0..bound) }
}

/// The per-position schedule of one scramble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScramblePlan {
    slots: Vec<Slot>,
}

impl ScramblePlan {
    /// Plan a transition from `old` to `new`, one slot per grapheme of the
    /// longer string.
    pub fn build(old: &str, new: &str, rng: &mut dyn RngCore, config: &ScrambleConfig) -> Self {
        let mut from = old.graphemes(true);
        let mut to = new.graphemes(true);
        let mut slots = Vec::new();
        loop {
            let (f, t) = (from.next(), to.next());
            if f.is_none() && t.is_none() {
                break;
            }
            let start = below(rng, config.max_start_frame);
            let end = start.saturating_add(below(rng, config.max_reveal_frames));
            slots.push(Slot {
                from: f.unwrap_or_default().to_owned(),
                to: t.unwrap_or_default().to_owned(),
                start,
                end,
                glyph: None,
            });
        }
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The text once every slot has settled.
    #[must_use]
    pub fn target(&self) -> String {
        self.slots.iter().map(|s| s.to.as_str()).collect()
    }

    /// The frame on which the last slot settles.
    #[must_use]
    pub fn settle_frame(&self) -> u32 {
        self.slots.iter().map(|s| s.end).max().unwrap_or(0)
    }

    /// Render `frame`. Returns the text and whether every slot has settled.
    pub fn render(
        &mut self,
        frame: u32,
        rng: &mut dyn RngCore,
        filler: &[char],
        redraw: f32,
    ) -> (String, bool) {
        let mut out = String::new();
        let mut settled = 0;
        for slot in &mut self.slots {
            let emit = slot.emit(frame, rng, filler, redraw);
            if emit.is_settled() {
                settled += 1;
            }
            emit.write(&mut out);
        }
        (out, settled == self.slots.len())
    }
}

#[derive(Debug)]
struct Settings {
    filler: Vec<char>,
    config: ScrambleConfig,
}

struct ScrambleRun {
    plan: ScramblePlan,
    frame: u32,
    resolver: Option<Resolver>,
    settings: Rc<Settings>,
}

/// A started scramble: its run and its completion signal.
#[derive(Debug, Clone)]
pub struct Scramble {
    pub run: RunHandle,
    pub signal: CompletionSignal,
}

/// Scrambles node text into new text.
#[derive(Clone)]
pub struct ScrambleText {
    settings: Rc<Settings>,
}

impl fmt::Debug for ScrambleText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrambleText")
            .field("config", &self.settings.config)
            .finish()
    }
}

impl Default for ScrambleText {
    fn default() -> Self {
        Self::new(ScrambleConfig::default())
    }
}

impl ScrambleText {
    /// An empty filler falls back to [`DEFAULT_FILLER`].
    #[must_use]
    pub fn new(config: ScrambleConfig) -> Self {
        let source = if config.filler.is_empty() {
            DEFAULT_FILLER
        } else {
            config.filler.as_str()
        };
        let filler = source.chars().collect();
        Self {
            settings: Rc::new(Settings { filler, config }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScrambleConfig {
        &self.settings.config
    }

    /// Scramble `node`'s text into `text`. `None` counts as empty.
    pub fn set_text<'a, H: FxHost>(
        &self,
        host: &mut H,
        node: NodeId,
        text: impl Into<Option<&'a str>>,
    ) -> CompletionSignal {
        self.start(host, node, text).signal
    }

    /// Like [`set_text`](Self::set_text), also returning the run handle.
    pub fn start<'a, H: FxHost>(
        &self,
        host: &mut H,
        node: NodeId,
        text: impl Into<Option<&'a str>>,
    ) -> Scramble {
        let new = text.into().unwrap_or_default();
        let run = host.start_run(node, KIND);
        let old = host.surface().text(node).unwrap_or_default().to_owned();
        let plan = ScramblePlan::build(&old, new, host.rng(), &self.settings.config);
        tracing::debug!(
            target: "glint.fx.scramble",
            node = %node,
            run = %run.id(),
            slots = plan.len(),
            settle_frame = plan.settle_frame(),
            "scramble started"
        );

        let (resolver, signal) = completion();
        let state = Rc::new(RefCell::new(ScrambleRun {
            plan,
            frame: 0,
            resolver: Some(resolver),
            settings: Rc::clone(&self.settings),
        }));
        run.set_state(state.clone());
        step(host, state, run.clone());
        Scramble { run, signal }
    }

    /// Finish the active scramble on `node` now: write its target text and
    /// resolve its signal. Returns `false` if no scramble is running there.
    pub fn skip<H: FxHost>(host: &mut H, node: NodeId) -> bool {
        let Some(run) = host.runs().active(node).cloned() else {
            return false;
        };
        let Some(state) = run.state::<RefCell<ScrambleRun>>() else {
            return false;
        };
        run.cancel(host.clock());
        let mut state = state.borrow_mut();
        let target = state.plan.target();
        host.surface().set_text(node, &target);
        if let Some(resolver) = state.resolver.take() {
            resolver.resolve();
        }
        tracing::debug!(target: "glint.fx.scramble", node = %node, frame = state.frame, "scramble skipped");
        host.finish_run(&run, u64::from(state.frame));
        true
    }
}

fn step<H: FxHost>(host: &mut H, state: Rc<RefCell<ScrambleRun>>, run: RunHandle) {
    if run.is_cancelled() {
        return;
    }
    let node = run.node();
    let mut guard = state.borrow_mut();
    let current = &mut *guard;
    let (text, done) = current.plan.render(
        current.frame,
        host.rng(),
        &current.settings.filler,
        current.settings.config.redraw_probability,
    );
    host.surface().set_text(node, &text);

    if done {
        tracing::debug!(target: "glint.fx.scramble", node = %node, frames = current.frame, "scramble settled");
        if let Some(resolver) = current.resolver.take() {
            resolver.resolve();
        }
        host.finish_run(&run, u64::from(current.frame));
        return;
    }

    current.frame = current.frame.saturating_add(1);
    drop(guard);
    let next = run.clone();
    run.schedule(
        host.clock(),
        Box::new(move |host: &mut H| step(host, state, next)),
    );
}
