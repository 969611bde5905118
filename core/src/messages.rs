//! Canned, contextual display strings for the payment-success screen. Pure
//! selection logic over the reward and progress state; rendering decides
//! where each message goes.

use alloc::format;
use alloc::string::{String, ToString};

use crate::{MilestoneProgress, Reward, RewardSet};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Tone {
    Celebration,
    Encouraging,
    Motivational,
    Supportive,
    Welcoming,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProgressMessage {
    pub text: String,
    /// Substring of `text` to emphasize when rendering.
    pub highlight: String,
    pub tone: Tone,
}

pub fn progress_message(progress: &MilestoneProgress) -> ProgressMessage {
    let remaining = progress.remaining();
    let percent = progress.percent();

    if remaining == 0 {
        return ProgressMessage {
            text: "Congratulations! You've completed all milestones!".to_string(),
            highlight: "All milestones".to_string(),
            tone: Tone::Celebration,
        };
    }

    let highlight = remaining.to_string();
    if percent >= 80 {
        ProgressMessage {
            text: format!(
                "You're almost there! Just {} {} away from your next reward.",
                remaining,
                plural(remaining.into(), "step", "steps")
            ),
            highlight,
            tone: Tone::Encouraging,
        }
    } else if percent >= 50 {
        ProgressMessage {
            text: format!(
                "Great progress! {} more {} your next reward.",
                remaining,
                plural(remaining.into(), "payment unlocks", "payments unlock")
            ),
            highlight,
            tone: Tone::Motivational,
        }
    } else if percent >= 25 {
        ProgressMessage {
            text: format!(
                "Keep going! {} more {} to unlock your next reward.",
                remaining,
                plural(remaining.into(), "payment", "payments")
            ),
            highlight,
            tone: Tone::Supportive,
        }
    } else {
        ProgressMessage {
            text: format!(
                "Start your journey! {} more {} to unlock your first reward.",
                remaining,
                plural(remaining.into(), "payment", "payments")
            ),
            highlight,
            tone: Tone::Welcoming,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StatusKind {
    Info,
    Success,
    Progress,
    Ready,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

pub fn reward_status_message(rewards: &RewardSet) -> StatusMessage {
    let total = rewards.len();
    let scratched = rewards.revealed_count();

    if total == 0 {
        StatusMessage {
            text: "Complete more payments to unlock rewards!".to_string(),
            kind: StatusKind::Info,
        }
    } else if scratched == total {
        StatusMessage {
            text: "All rewards revealed! Check back after your next payment for more.".to_string(),
            kind: StatusKind::Success,
        }
    } else if scratched > 0 {
        let waiting = total - scratched;
        StatusMessage {
            text: format!(
                "Great! {} more {} waiting to be revealed.",
                waiting,
                plural(waiting, "reward", "rewards")
            ),
            kind: StatusKind::Progress,
        }
    } else {
        StatusMessage {
            text: format!(
                "You've unlocked {} {}! Scratch to reveal {}.",
                total,
                plural(total, "reward", "rewards"),
                plural(total, "it", "them")
            ),
            kind: StatusKind::Ready,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GuidanceAction {
    Scratch,
    Continue,
    Complete,
    Reveal,
    Wait,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Guidance {
    pub text: String,
    pub action: GuidanceAction,
}

/// Next-step guidance. `browsing` is true while the scratch-card view is
/// open, false on the receipt face.
pub fn next_step_guidance(
    rewards: &RewardSet,
    progress: &MilestoneProgress,
    browsing: bool,
) -> Guidance {
    if browsing {
        let total = rewards.len();
        let scratched = rewards.revealed_count();

        return if scratched == 0 {
            Guidance {
                text: "Start scratching to reveal your rewards!".to_string(),
                action: GuidanceAction::Scratch,
            }
        } else if scratched < total {
            let remaining = total - scratched;
            Guidance {
                text: format!(
                    "Continue scratching to reveal your remaining {} {}.",
                    remaining,
                    plural(remaining, "reward", "rewards")
                ),
                action: GuidanceAction::Continue,
            }
        } else {
            Guidance {
                text: "All rewards revealed! Complete more payments to unlock new rewards."
                    .to_string(),
                action: GuidanceAction::Complete,
            }
        };
    }

    if progress.remaining() == 0 {
        Guidance {
            text: "All milestones complete! Click below to reveal your rewards.".to_string(),
            action: GuidanceAction::Reveal,
        }
    } else if !rewards.is_empty() {
        Guidance {
            text: "Click below to reveal your unlocked rewards.".to_string(),
            action: GuidanceAction::Reveal,
        }
    } else {
        Guidance {
            text: "Complete more payments to unlock rewards.".to_string(),
            action: GuidanceAction::Wait,
        }
    }
}

/// Celebration line announced when a reward is disclosed.
pub fn reveal_celebration(reward: &Reward) -> String {
    let title = reward.title.to_lowercase();

    if title.contains("cashback") {
        format!("Congratulations! You've won {} cashback!", reward.reward_value)
    } else if title.contains("discount") || title.contains("coupon") {
        format!("Amazing! You've unlocked a {}% discount!", reward.reward_value)
    } else {
        "Congratulations! Your reward has been revealed!".to_string()
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
