use chrono::prelude::*;
use clap::Args;
use rasca_core as rasca;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::card::ScratchCardView;
use crate::progress::ProgressView;
use crate::provider;
use crate::theme::Theme;

/// Carousel position, clamped to the reward set bounds. Navigating past
/// either end stays put instead of wrapping or erroring.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct CardCursor {
    index: usize,
}

impl CardCursor {
    pub(crate) fn index(self) -> usize {
        self.index
    }

    pub(crate) fn next(&mut self, len: usize) -> bool {
        if self.index + 1 < len {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }
}

#[derive(Debug)]
pub(crate) enum Msg {
    Loaded(anyhow::Result<provider::RewardsResponse>),
    Reveal(String, rasca::Reward),
    ShowRewards,
    ShowReceipt,
    NextCard,
    PrevCard,
    ToggleTheme,
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct ScreenProps {
    /// Force a transaction id instead of the demo default
    #[arg(short, long)]
    pub txn: Option<String>,
}

/// Post-payment screen: single source of truth for the reward set, fan-out
/// of records to the per-card scratch controllers, fan-in of their reveal
/// events.
#[derive(Debug)]
pub(crate) struct ScreenView {
    rewards: rasca::RewardSet,
    progress: rasca::MilestoneProgress,
    loading: bool,
    browsing: bool,
    cursor: CardCursor,
    payment_id: String,
    fetched_at: Option<DateTime<Utc>>,
    theme: Theme,
}

impl ScreenView {
    fn fetch(ctx: &Context<Self>, payment_id: String) {
        let link = ctx.link().clone();
        spawn_local(async move {
            link.send_message(Msg::Loaded(provider::fetch_rewards(&payment_id).await));
        });
    }

    fn can_browse(&self) -> bool {
        !self.loading && !self.rewards.is_empty()
    }

    fn view_receipt(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let cb_show_rewards = ctx.link().callback(|_: MouseEvent| ShowRewards);
        let date_time = self
            .fetched_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        let cta_label = if self.loading {
            "Loading rewards, please wait".to_string()
        } else if self.rewards.len() == 1 {
            "Reveal your reward scratch card".to_string()
        } else {
            format!("Reveal your {} reward scratch cards", self.rewards.len())
        };

        html! {
            <>
                <header class="success-header" aria-label="success">
                    <div class="success-brand">
                        <div class="brand-text">
                            <div class="brand-name">{ "PaySuccess" }</div>
                            <div class="brand-sub">{ "Receipt" }</div>
                        </div>
                    </div>
                </header>
                <div class="payment-success-body">
                    <section class="payment-details" aria-labelledby="payment-title">
                        <h1 id="payment-title" class="payment-title">{ "Payment Successful" }</h1>
                        <p class="payment-success-subtitle">{ "Your transaction has been completed" }</p>
                        <dl class="payment-metadata">
                            <div>
                                <dt>{ "Amount paid" }</dt>
                                <dd>{ provider::DEMO_AMOUNT_PAID }</dd>
                            </div>
                            <div>
                                <dt>{ "Transaction ID" }</dt>
                                <dd>{ &self.payment_id }</dd>
                            </div>
                            <div>
                                <dt>{ "Date & time" }</dt>
                                <dd>{ date_time }</dd>
                            </div>
                        </dl>
                    </section>
                    if !self.loading {
                        <ProgressView progress={self.progress.clone()} />
                        { self.view_rewards_earned(ctx) }
                    }
                    <button
                        class="payment-success-cta"
                        type="button"
                        onclick={cb_show_rewards}
                        aria-label={cta_label}
                        disabled={!self.can_browse()}
                    >
                        { if self.loading { "Loading..." } else { "Reveal Rewards" } }
                    </button>
                </div>
            </>
        }
    }

    fn view_rewards_earned(&self, _ctx: &Context<Self>) -> Html {
        if self.rewards.is_empty() {
            return Html::default();
        }

        let status = rasca::reward_status_message(&self.rewards);
        let guidance = rasca::next_step_guidance(&self.rewards, &self.progress, false);

        html! {
            <section class="rewards-earned-section" aria-labelledby="rewards-earned-title">
                <div class="rewards-earned-header">
                    <h2 id="rewards-earned-title" class="rewards-earned-title">{ "Rewards Earned" }</h2>
                    <div class="rewards-count-badge">
                        <span class="rewards-count-number">{ self.rewards.len() }</span>
                        <span class="rewards-count-label">
                            { if self.rewards.len() == 1 { "Reward" } else { "Rewards" } }
                        </span>
                    </div>
                </div>
                <p class="rewards-earned-description">{ status.text }</p>
                <p class="rewards-next-step">{ guidance.text }</p>
            </section>
        }
    }

    fn view_rewards(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let len = self.rewards.len();
        let current = self.cursor.index();
        let guidance = rasca::next_step_guidance(&self.rewards, &self.progress, true);
        let on_reveal = ctx
            .link()
            .callback(|(id, reward): (String, rasca::Reward)| Msg::Reveal(id, reward));

        let cb_back = ctx.link().callback(|_: MouseEvent| ShowReceipt);
        let cb_prev = ctx.link().callback(|_: MouseEvent| PrevCard);
        let cb_next = ctx.link().callback(|_: MouseEvent| NextCard);

        html! {
            <>
                <div class="rewards-header">
                    <button
                        type="button"
                        class="rewards-back-button"
                        onclick={cb_back}
                        aria-label="Back to payment details"
                    >
                        { "\u{2190} Back" }
                    </button>
                    <h2 class="rewards-view-title">{ "Your Rewards" }</h2>
                </div>
                <div class="rewards-container" role="region" aria-label="Rewards scratch cards">
                    <div class="rewards-guidance-message">
                        <p>{ guidance.text }</p>
                    </div>
                    <div class="card-stack">
                        {
                            for self.rewards.iter().enumerate().map(|(i, reward)| {
                                // every card stays mounted so partially
                                // scratched surfaces survive navigation
                                let stack_class = classes!(
                                    "reward-item",
                                    match i.cmp(&current) {
                                        core::cmp::Ordering::Less => "stack-prev",
                                        core::cmp::Ordering::Equal => "stack-current",
                                        core::cmp::Ordering::Greater => "stack-next",
                                    },
                                    format!("stack-depth-{}", i.abs_diff(current).min(3)),
                                );
                                html! {
                                    <div key={reward.id.clone()} class={stack_class}>
                                        <h3 class="reward-item-title">{ &reward.title }</h3>
                                        <ScratchCardView
                                            reward={reward.clone()}
                                            scratched={reward.scratched}
                                            on_reveal={on_reveal.clone()}
                                        />
                                    </div>
                                }
                            })
                        }
                    </div>
                    <nav class="card-stack-nav" aria-label="Reward carousel">
                        <button
                            type="button"
                            onclick={cb_prev}
                            disabled={current == 0}
                            aria-label="Previous reward"
                        >
                            { "\u{2039}" }
                        </button>
                        <span class="card-stack-counter">
                            { format!("{} / {}", current + 1, len.max(1)) }
                        </span>
                        <button
                            type="button"
                            onclick={cb_next}
                            disabled={current + 1 >= len}
                            aria-label="Next reward"
                        >
                            { "\u{203a}" }
                        </button>
                    </nav>
                    <p class="rewards-revealed-counter" role="status" aria-live="polite">
                        { format!("Revealed {} of {}", self.rewards.revealed_count(), len) }
                    </p>
                    if self.rewards.all_revealed() {
                        <div class="rewards-completion-message">
                            <p>{ "All rewards revealed! Complete more payments to unlock new rewards." }</p>
                        </div>
                    }
                </div>
            </>
        }
    }
}

impl Component for ScreenView {
    type Message = Msg;
    type Properties = ScreenProps;

    fn create(ctx: &Context<Self>) -> Self {
        let payment_id = ctx
            .props()
            .txn
            .clone()
            .unwrap_or_else(|| provider::DEMO_PAYMENT_ID.to_string());
        Self::fetch(ctx, payment_id.clone());

        Self {
            rewards: Default::default(),
            progress: Default::default(),
            loading: true,
            browsing: false,
            cursor: Default::default(),
            payment_id,
            fetched_at: None,
            theme: Theme::init(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Loaded(Ok(response)) => {
                log::debug!(
                    "loaded {} rewards for payment {:?}",
                    response.rewards.len(),
                    response.payment_id
                );
                self.rewards = response.rewards;
                self.progress = response.progress;
                self.fetched_at = Some(response.fetched_at);
                self.loading = false;
                self.cursor.clamp(self.rewards.len());
                true
            }
            Loaded(Err(err)) => {
                // no retry: the screen settles into a loading-cleared empty
                // state
                log::error!("failed to load rewards: {:#}", err);
                self.loading = false;
                true
            }
            Reveal(id, _record) => {
                log::debug!("reveal reported for reward {:?}", id);
                self.rewards.mark_scratched(&id).has_update()
            }
            ShowRewards => {
                if self.can_browse() && !self.browsing {
                    self.browsing = true;
                    true
                } else {
                    false
                }
            }
            ShowReceipt => {
                if self.browsing {
                    self.browsing = false;
                    true
                } else {
                    false
                }
            }
            NextCard => self.cursor.next(self.rewards.len()),
            PrevCard => self.cursor.prev(),
            ToggleTheme => {
                self.theme = self.theme.toggled();
                self.theme.apply();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let cb_toggle_theme = ctx.link().callback(|_: MouseEvent| Msg::ToggleTheme);
        let face_label = if self.browsing {
            "Rewards Scratch Card"
        } else {
            "Payment Success Card"
        };

        html! {
            <main class="rasca payment-success-main">
                <small class="theme-toggle" onclick={cb_toggle_theme}>
                    { self.theme.toggled().scheme() }
                </small>
                <section class="payment-success-container" aria-label={face_label}>
                    {
                        if self.browsing {
                            self.view_rewards(ctx)
                        } else {
                            self.view_receipt(ctx)
                        }
                    }
                </section>
            </main>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_from_last_card_stays_at_last() {
        let mut cursor = CardCursor::default();

        assert!(cursor.next(2));
        assert_eq!(cursor.index(), 1);
        assert!(!cursor.next(2));
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn prev_from_first_card_stays_at_first() {
        let mut cursor = CardCursor::default();

        assert!(!cursor.prev());
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn cursor_never_moves_in_an_empty_set() {
        let mut cursor = CardCursor::default();

        assert!(!cursor.next(0));
        assert_eq!(cursor.index(), 0);
    }

    #[test]
    fn clamp_pulls_the_cursor_back_into_bounds() {
        let mut cursor = CardCursor::default();
        cursor.next(5);
        cursor.next(5);

        cursor.clamp(2);
        assert_eq!(cursor.index(), 1);

        cursor.clamp(0);
        assert_eq!(cursor.index(), 0);
    }
}
