#![forbid(unsafe_code)]

//! Transient notifications.
//!
//! A toast is a text node that slides and scales in, holds, slides back
//! out, and removes itself. A fallback timer removes it as well, so a stalled
//! engine cannot leave it on screen. The returned signal resolves once the
//! node is gone.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use glint_core::animation::Keyframes;
use glint_core::clock::FrameHandle;
use glint_core::signal::{CompletionSignal, Resolver, completion};
use glint_render::{NodeId, NodeKind, Property};
use glint_runtime::{FxHost, TweenRequest};

use crate::config::ToastConfig;

struct Toast {
    node: NodeId,
    resolver: RefCell<Option<Resolver>>,
    fallback: Cell<Option<FrameHandle>>,
}

impl Toast {
    fn remove<H: FxHost>(&self, host: &mut H, fallback: bool) {
        let Some(resolver) = self.resolver.borrow_mut().take() else {
            return;
        };
        if let Some(timer) = self.fallback.take() {
            if !fallback {
                host.clock().cancel_frame(timer);
            }
        }
        host.surface().detach(self.node);
        tracing::debug!(target: "glint.fx.toast", node = %self.node, fallback, "toast removed");
        resolver.resolve();
    }
}

/// Show `text` in a new node under `parent`.
pub fn toast<H: FxHost>(
    host: &mut H,
    parent: NodeId,
    text: &str,
    config: &ToastConfig,
) -> CompletionSignal {
    let surface = host.surface();
    let node = surface.create_node(NodeKind::Text);
    surface.set_text(node, text);
    surface.set_property(node, Property::Opacity, 0.0);
    surface.set_property(node, Property::TranslateY, config.offset_y);
    surface.set_property(node, Property::Scale, config.start_scale);
    surface.attach(parent, node);

    let (resolver, signal) = completion();
    let toast = Rc::new(Toast {
        node,
        resolver: RefCell::new(Some(resolver)),
        fallback: Cell::new(None),
    });

    let enter = TweenRequest::new(node, Duration::from_millis(config.enter_ms))
        .easing(config.enter_easing)
        .keyframes(Property::Opacity, Keyframes::between(0.0, 1.0))
        .keyframes(Property::TranslateY, Keyframes::between(config.offset_y, 0.0))
        .keyframes(Property::Scale, Keyframes::between(config.start_scale, 1.0));
    let exit = TweenRequest::new(node, Duration::from_millis(config.exit_ms))
        .easing(config.exit_easing)
        .to(Property::Opacity, 0.0)
        .to(Property::TranslateY, config.offset_y)
        .to(Property::Scale, config.start_scale);
    let hold = Duration::from_millis(config.hold_ms);

    let on_exit = Rc::clone(&toast);
    host.tweens().animate(
        enter,
        Some(Box::new(move |host: &mut H| {
            if !host.surface().contains(on_exit.node) {
                on_exit.remove(host, false);
                return;
            }
            host.clock().request_timeout(
                hold,
                Box::new(move |host: &mut H| {
                    host.tweens().animate(
                        exit,
                        Some(Box::new(move |host: &mut H| on_exit.remove(host, false))),
                    );
                }),
            );
        })),
    );

    let on_timeout = Rc::clone(&toast);
    let grace = Duration::from_millis(config.fallback_grace_ms);
    let timer = host.clock().request_timeout(
        config.total() + grace,
        Box::new(move |host: &mut H| on_timeout.remove(host, true)),
    );
    toast.fallback.set(Some(timer));
    tracing::debug!(target: "glint.fx.toast", node = %node, "toast shown");
    signal
}
