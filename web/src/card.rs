use bitflags::bitflags;
use gloo::timers::callback::Timeout;
use rasca_core as rasca;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use yew::prelude::*;

/// Debounce window for coverage checks while the pointer keeps moving.
const CHECK_INTERVAL_MS: u32 = 200;
/// Shorter delay for the final check after the gesture ends, to catch the
/// last stroke segment.
const FINAL_CHECK_MS: u32 = 100;

const OVERLAY_COLOR_START: &str = "#e0e2e7";
const OVERLAY_COLOR_END: &str = "#d2d3d7";

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct MouseButtons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

pub(crate) trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E> HasUpdate for Result<rasca::ScratchOutcome, E> {
    fn has_update(self) -> bool {
        self.map_or(false, |outcome: rasca::ScratchOutcome| outcome.has_update())
    }
}

/// Stroke positions travel as viewport client coordinates and are mapped to
/// surface-local units against the canvas rect when handled.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    StrokeBegin(rasca::Point),
    StrokeMove(rasca::Point),
    StrokeEnd,
    CoverageCheck,
    KeyboardReveal,
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct CardProps {
    pub reward: rasca::Reward,
    #[prop_or_default]
    pub scratched: bool,
    pub on_reveal: Callback<(String, rasca::Reward)>,
}

/// One reward card's scratch overlay: owns the surface state machine, the
/// canvas node painted on top of it, and the pending debounced coverage
/// check. The canvas is cosmetic; every reveal decision comes from the
/// surface mask.
pub(crate) struct ScratchCardView {
    surface: Option<rasca::ScratchSurface>,
    canvas_ref: NodeRef,
    _pending_check: Option<Timeout>,
    announcement: Option<String>,
    needs_overlay_paint: bool,
}

impl ScratchCardView {
    fn surface_spec() -> rasca::SurfaceSpec {
        if crate::utils::is_narrow_viewport() {
            rasca::SurfaceSpec::card_touch()
        } else {
            rasca::SurfaceSpec::card()
        }
    }

    fn make_surface(props: &CardProps) -> Option<rasca::ScratchSurface> {
        // A reward that arrives already scratched never gets an interactive
        // overlay.
        (!props.scratched).then(|| rasca::ScratchSurface::new(Self::surface_spec()))
    }

    /// Latched during this session: the canvas stays mounted for the
    /// fade-out and the success banner shows.
    fn session_revealed(&self) -> bool {
        self.surface
            .as_ref()
            .map_or(false, |surface| surface.is_revealed())
    }

    /// Mounted with `scratched` already set: disclosed content only, no
    /// overlay and no banner.
    fn mounted_pre_revealed(&self) -> bool {
        self.surface.is_none()
    }

    fn schedule_check(&mut self, ctx: &Context<Self>, delay_ms: u32) {
        let link = ctx.link().clone();
        // replacing the timeout drops, and thereby cancels, the previous one
        self._pending_check = Some(Timeout::new(delay_ms, move || {
            link.send_message(Msg::CoverageCheck)
        }));
    }

    /// Latch is already set when this runs; from here on every pointer and
    /// timer handler is a no-op, so the fade can start safely.
    fn commit_reveal(&mut self, ctx: &Context<Self>) {
        self._pending_check = None;

        let reward = &ctx.props().reward;
        self.announcement = Some(rasca::reveal_celebration(reward));
        log::debug!("reveal committed for reward {:?}", reward.id);

        ctx.props()
            .on_reveal
            .emit((reward.id.clone(), reward.clone()));
    }

    fn canvas_2d(&self) -> Option<CanvasRenderingContext2d> {
        let canvas = self.canvas_ref.cast::<HtmlCanvasElement>()?;
        canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()
    }

    fn paint_overlay(&self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let Some(ctx2d) = self.canvas_2d() else {
            return;
        };

        let (w, h) = surface.spec().size;
        let (w, h) = (f64::from(w), f64::from(h));
        ctx2d.clear_rect(0.0, 0.0, w, h);
        let gradient = ctx2d.create_linear_gradient(0.0, 0.0, w, h);
        if gradient.add_color_stop(0.0, OVERLAY_COLOR_START).is_err()
            || gradient.add_color_stop(1.0, OVERLAY_COLOR_END).is_err()
        {
            log::error!("could not build overlay gradient");
            return;
        }
        ctx2d.set_fill_style_canvas_gradient(&gradient);
        ctx2d.fill_rect(0.0, 0.0, w, h);
    }

    fn punch_hole(&self, (x, y): rasca::Point) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let Some(ctx2d) = self.canvas_2d() else {
            return;
        };

        let radius = f64::from(surface.spec().brush_radius);
        if ctx2d
            .set_global_composite_operation("destination-out")
            .is_err()
        {
            return;
        }
        ctx2d.begin_path();
        if ctx2d
            .arc(x, y, radius, 0.0, core::f64::consts::TAU)
            .is_ok()
        {
            ctx2d.fill();
        }
        let _ = ctx2d.set_global_composite_operation("source-over");
    }

    fn clear_overlay(&self) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let Some(ctx2d) = self.canvas_2d() else {
            return;
        };

        let (w, h) = surface.spec().size;
        ctx2d.clear_rect(0.0, 0.0, f64::from(w), f64::from(h));
    }

    fn pointer_pos(&self, client_x: f64, client_y: f64) -> Option<rasca::Point> {
        let canvas = self.canvas_ref.cast::<HtmlCanvasElement>()?;
        let rect = canvas.get_bounding_client_rect();
        Some((client_x - rect.left(), client_y - rect.top()))
    }
}

/// A reward swap replaces the surface; a `scratched` confirmation on the
/// same id does not.
fn reward_swapped(old: &CardProps, new: &CardProps) -> bool {
    new.reward.id != old.reward.id
}

fn clear_text_selection() {
    if let Ok(Some(selection)) = gloo::utils::window().get_selection() {
        let _ = selection.remove_all_ranges();
    }
}

fn first_touch_pos(e: &TouchEvent) -> Option<(f64, f64)> {
    let touch = e.touches().get(0)?;
    Some((f64::from(touch.client_x()), f64::from(touch.client_y())))
}

impl Component for ScratchCardView {
    type Message = Msg;
    type Properties = CardProps;

    fn create(ctx: &Context<Self>) -> Self {
        let surface = Self::make_surface(ctx.props());
        let needs_overlay_paint = surface.is_some();
        Self {
            surface,
            canvas_ref: NodeRef::default(),
            _pending_check: None,
            announcement: None,
            needs_overlay_paint,
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();
        if !reward_swapped(old_props, props) {
            // Parent confirmation of this card's own reveal (`scratched`
            // flipping on the same id) keeps the latched surface, so the
            // fade-out and success banner stay rendered.
            return true;
        }

        // Reward swap: drop the pending check first so a stale timer can
        // never fire against the replacement surface.
        self._pending_check = None;
        self.announcement = None;
        self.surface = Self::make_surface(props);
        self.needs_overlay_paint = self.surface.is_some();
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            StrokeBegin((client_x, client_y)) => {
                let Some(pos) = self.pointer_pos(client_x, client_y) else {
                    return false;
                };
                let Some(surface) = self.surface.as_mut() else {
                    return false;
                };
                clear_text_selection();
                log::trace!("stroke begin at {:?}", pos);
                let outcome = surface.begin_stroke(pos);
                if outcome.has_update() {
                    self.punch_hole(pos);
                }
                false
            }
            StrokeMove((client_x, client_y)) => {
                let Some(pos) = self.pointer_pos(client_x, client_y) else {
                    return false;
                };
                let Some(surface) = self.surface.as_mut() else {
                    return false;
                };
                let outcome = surface.continue_stroke(pos);
                if outcome.has_update() {
                    self.punch_hole(pos);
                }
                if self.surface.as_ref().map_or(false, |s| s.is_drawing()) {
                    self.schedule_check(ctx, CHECK_INTERVAL_MS);
                }
                false
            }
            StrokeEnd => {
                let Some(surface) = self.surface.as_mut() else {
                    return false;
                };
                if surface.end_stroke().is_ok() {
                    log::trace!("stroke end");
                    self.schedule_check(ctx, FINAL_CHECK_MS);
                }
                false
            }
            CoverageCheck => {
                self._pending_check = None;
                let Some(surface) = self.surface.as_mut() else {
                    return false;
                };
                log::trace!("coverage check: {:.2}", surface.coverage());
                if surface.check_coverage().is_revealed() {
                    self.commit_reveal(ctx);
                    true
                } else {
                    false
                }
            }
            KeyboardReveal => {
                let Some(surface) = self.surface.as_mut() else {
                    return false;
                };
                if surface.reveal().is_revealed() {
                    self.clear_overlay();
                    self.commit_reveal(ctx);
                    true
                } else {
                    false
                }
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if self.needs_overlay_paint {
            self.needs_overlay_paint = false;
            self.paint_overlay();
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let reward = &ctx.props().reward;
        let pre_revealed = self.mounted_pre_revealed();
        let session_revealed = self.session_revealed();
        let revealed = pre_revealed || session_revealed;
        let interactive = !revealed;

        let card_class = classes!(
            "reward-scratch-card",
            pre_revealed.then_some("disabled"),
            revealed.then_some("revealed"),
        );
        let text_class = classes!(
            "reward-text",
            if revealed {
                "reveal-fade-in"
            } else {
                "hidden-unrevealed"
            }
        );

        let onkeydown = ctx.link().batch_callback(move |e: KeyboardEvent| {
            let key = e.key();
            if key == "Enter" || key == " " {
                e.prevent_default();
                Some(Msg::KeyboardReveal)
            } else {
                None
            }
        });

        let card_aria_label = if revealed {
            format!("{} has already been revealed", reward.title)
        } else {
            format!("Scratch card to reveal {}", reward.title)
        };

        html! {
            <div
                class={card_class}
                role="article"
                aria-label={card_aria_label}
                tabindex={if interactive { "0" } else { "-1" }}
                onkeydown={interactive.then_some(onkeydown)}
            >
                <div class="reward-content">
                    <div class={text_class} aria-live="polite" aria-atomic="true">
                        { &reward.description }
                    </div>
                    { self.view_canvas(ctx, revealed) }
                    if interactive {
                        <span class="scratch-instructions" role="status" aria-live="polite">
                            { "Scratch to reveal your reward. Press Enter for keyboard access." }
                        </span>
                    }
                </div>
                if session_revealed {
                    <div class="scratch-success-message scale-reveal" role="status" aria-live="polite">
                        { "Reward Unlocked!" }
                    </div>
                }
                <div class="sr-only" aria-live="polite" aria-atomic="true" role="status">
                    { self.announcement.clone().unwrap_or_default() }
                </div>
            </div>
        }
    }
}

impl ScratchCardView {
    fn view_canvas(&self, ctx: &Context<Self>, revealed: bool) -> Html {
        let Some(surface) = self.surface.as_ref() else {
            // pre-revealed mount: no overlay at all
            return Html::default();
        };
        let (width, height) = surface.spec().size;

        // once revealed the canvas stays mounted for the fade-out but takes
        // no further input
        let class = classes!(
            "scratch-canvas",
            if revealed { "fading" } else { "interactive" }
        );

        let onmousedown = ctx.link().batch_callback(|e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            if !buttons.contains(MouseButtons::LEFT) {
                return None;
            }
            e.prevent_default();
            e.stop_propagation();
            Some(Msg::StrokeBegin((
                f64::from(e.client_x()),
                f64::from(e.client_y()),
            )))
        });
        let onmousemove = ctx.link().callback(|e: MouseEvent| {
            e.prevent_default();
            Msg::StrokeMove((f64::from(e.client_x()), f64::from(e.client_y())))
        });
        let onmouseup = ctx.link().callback(|_: MouseEvent| Msg::StrokeEnd);
        let onmouseleave = ctx.link().callback(|_: MouseEvent| Msg::StrokeEnd);

        let ontouchstart = ctx.link().batch_callback(|e: TouchEvent| {
            e.prevent_default();
            first_touch_pos(&e).map(Msg::StrokeBegin)
        });
        let ontouchmove = ctx.link().batch_callback(|e: TouchEvent| {
            e.prevent_default();
            first_touch_pos(&e).map(Msg::StrokeMove)
        });
        let ontouchend = ctx.link().callback(|e: TouchEvent| {
            e.prevent_default();
            Msg::StrokeEnd
        });

        let aria_label = if revealed {
            format!("{} has been revealed", ctx.props().reward.title)
        } else {
            format!(
                "Scratch card for {}. Use your finger or mouse to scratch the surface, or press Enter to reveal",
                ctx.props().reward.title
            )
        };

        html! {
            <canvas
                ref={self.canvas_ref.clone()}
                width={width.to_string()}
                height={height.to_string()}
                {class}
                role={if revealed { "img" } else { "button" }}
                aria-label={aria_label}
                aria-hidden={revealed.then_some("true")}
                tabindex="-1"
                onmousedown={(!revealed).then_some(onmousedown)}
                onmousemove={(!revealed).then_some(onmousemove)}
                onmouseup={(!revealed).then_some(onmouseup)}
                onmouseleave={(!revealed).then_some(onmouseleave)}
                ontouchstart={(!revealed).then_some(ontouchstart)}
                ontouchmove={(!revealed).then_some(ontouchmove)}
                ontouchend={(!revealed).then_some(ontouchend)}
            />
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_reward() -> rasca::Reward {
        rasca::Reward {
            id: "r1".to_string(),
            title: "Cashback Reward".to_string(),
            description: "You won ₹100 Cashback!".to_string(),
            reward_value: 100,
            scratched: false,
        }
    }

    fn props(scratched: bool) -> CardProps {
        CardProps {
            reward: demo_reward(),
            scratched,
            on_reveal: Callback::noop(),
        }
    }

    #[test]
    fn scratched_confirmation_on_the_same_reward_is_not_a_swap() {
        let old = props(false);

        assert!(!reward_swapped(&old, &props(true)));

        let mut other = props(false);
        other.reward.id = "r2".to_string();
        assert!(reward_swapped(&old, &other));
    }

    #[test]
    fn confirmed_card_keeps_its_fading_canvas_and_banner() {
        let mut surface = rasca::ScratchSurface::new(rasca::SurfaceSpec::card());
        assert!(surface.reveal().is_revealed());

        // state after the parent confirms the reveal: the latched surface is
        // still mounted, so the fade class and success banner keep rendering
        let card = ScratchCardView {
            surface: Some(surface),
            canvas_ref: NodeRef::default(),
            _pending_check: None,
            announcement: None,
            needs_overlay_paint: false,
        };

        assert!(card.session_revealed());
        assert!(!card.mounted_pre_revealed());
    }

    #[test]
    fn pre_revealed_mount_has_no_surface_or_banner() {
        let card = ScratchCardView {
            surface: ScratchCardView::make_surface(&props(true)),
            canvas_ref: NodeRef::default(),
            _pending_check: None,
            announcement: None,
            needs_overlay_paint: false,
        };

        assert!(card.mounted_pre_revealed());
        assert!(!card.session_revealed());
    }
}
