use rasca_core as rasca;
use yew::prelude::*;

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct ProgressProps {
    pub progress: rasca::MilestoneProgress,
}

/// Milestone track with checkpoint markers and the tiered progress message.
#[function_component]
pub(crate) fn ProgressView(props: &ProgressProps) -> Html {
    let progress = &props.progress;
    let percent = progress.percent();
    let message = rasca::progress_message(progress);

    // checkpoint N sits at N-1 / (total-1) along the track
    let spacing = u32::from(progress.total.max(2)) - 1;

    html! {
        <section class="milestone-progress" aria-labelledby="milestone-title">
            <h2 id="milestone-title" class="milestone-title">
                { format!("Milestone Progress: {} of {}", progress.completed, progress.total) }
            </h2>
            <div
                class="milestone-track"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow={percent.to_string()}
                aria-label={format!("{} of {} milestones complete", progress.completed, progress.total)}
            >
                <div class="milestone-fill" style={format!("width: {}%;", percent)} />
                {
                    for progress.checkpoints().map(|checkpoint| {
                        let marker_class = classes!(
                            "milestone-checkpoint",
                            checkpoint.completed.then_some("completed"),
                            checkpoint.next.then_some("next"),
                        );
                        let left = u32::from(checkpoint.number - 1) * 100 / spacing;
                        html! {
                            <div
                                key={checkpoint.number}
                                class={marker_class}
                                style={format!("left: {}%;", left)}
                                title={checkpoint.label.clone()}
                            >
                                <span class="milestone-checkpoint-number" aria-hidden="true">
                                    {
                                        if checkpoint.completed {
                                            "\u{2713}".to_string()
                                        } else {
                                            checkpoint.number.to_string()
                                        }
                                    }
                                </span>
                            </div>
                        }
                    })
                }
            </div>
            <p class="milestone-message">
                { render_highlighted(&message.text, &message.highlight) }
            </p>
        </section>
    }
}

/// Wraps the first occurrence of `highlight` in the message text so the
/// stylesheet can emphasize it. Falls back to plain text when the fragment
/// is absent.
fn render_highlighted(text: &str, highlight: &str) -> Html {
    if highlight.is_empty() {
        return html! { {text} };
    }
    match text.split_once(highlight) {
        Some((before, after)) => html! {
            <>
                { before }
                <strong class="milestone-highlight">{ highlight }</strong>
                { after }
            </>
        },
        None => html! { {text} },
    }
}
