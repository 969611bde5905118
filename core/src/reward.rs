use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// One gamified disclosure unit. `scratched` is monotonic: once true it never
/// reverts for the lifetime of the record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_value: u32,
    pub scratched: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Ordered reward records owned by the reveal coordinator. Cards only ever
/// see copies plus a callback; this is the single source of truth for which
/// rewards are disclosed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardSet {
    rewards: Vec<Reward>,
}

impl RewardSet {
    pub fn new(rewards: Vec<Reward>) -> Self {
        Self { rewards }
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Reward> {
        self.rewards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reward> {
        self.rewards.iter()
    }

    /// Fan-in of a reveal notification. Unknown ids and already-scratched
    /// records are silent no-ops, so a stale callback from a torn-down
    /// surface cannot corrupt state.
    pub fn mark_scratched(&mut self, id: &str) -> MarkOutcome {
        match self.rewards.iter_mut().find(|r| r.id == id) {
            Some(reward) if !reward.scratched => {
                reward.scratched = true;
                MarkOutcome::Changed
            }
            Some(_) => MarkOutcome::NoChange,
            None => {
                log::debug!("ignoring reveal for unknown reward id {:?}", id);
                MarkOutcome::NoChange
            }
        }
    }

    pub fn revealed_count(&self) -> usize {
        self.rewards.iter().filter(|r| r.scratched).count()
    }

    pub fn concealed_count(&self) -> usize {
        self.len() - self.revealed_count()
    }

    pub fn all_revealed(&self) -> bool {
        !self.is_empty() && self.revealed_count() == self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScratchOutcome, ScratchSurface, SurfaceSpec};
    use alloc::string::ToString;
    use alloc::vec;

    fn two_rewards() -> RewardSet {
        RewardSet::new(vec![
            Reward {
                id: "r1".to_string(),
                title: "Cashback Reward".to_string(),
                description: "You won ₹100 Cashback!".to_string(),
                reward_value: 100,
                scratched: false,
            },
            Reward {
                id: "r2".to_string(),
                title: "Discount Coupon".to_string(),
                description: "Get 15% off on your next purchase".to_string(),
                reward_value: 15,
                scratched: false,
            },
        ])
    }

    #[test]
    fn mark_scratched_updates_only_the_matching_record() {
        let mut rewards = two_rewards();

        assert_eq!(rewards.mark_scratched("r1"), MarkOutcome::Changed);

        assert!(rewards.get(0).unwrap().scratched);
        assert!(!rewards.get(1).unwrap().scratched);
        assert_eq!(rewards.revealed_count(), 1);
    }

    #[test]
    fn scratched_flag_is_monotonic() {
        let mut rewards = two_rewards();

        assert_eq!(rewards.mark_scratched("r2"), MarkOutcome::Changed);
        assert_eq!(rewards.mark_scratched("r2"), MarkOutcome::NoChange);
        assert!(rewards.get(1).unwrap().scratched);
    }

    #[test]
    fn unknown_id_is_a_silent_no_op() {
        let mut rewards = two_rewards();

        assert_eq!(rewards.mark_scratched("r9"), MarkOutcome::NoChange);
        assert_eq!(rewards.revealed_count(), 0);
    }

    #[test]
    fn all_revealed_is_false_for_an_empty_set() {
        assert!(!RewardSet::default().all_revealed());
    }

    #[test]
    fn scratching_one_card_past_threshold_reveals_exactly_once() {
        // Full scenario: gesture coverage past the threshold produces one
        // reveal, and the coordinator state reflects exactly that card.
        let mut rewards = two_rewards();
        let mut surface = ScratchSurface::new(SurfaceSpec::new((10, 10), 0, 0.60, 1));

        surface.begin_stroke((0.0, 0.0)).unwrap();
        for x in 0..10u16 {
            for y in 0..10u16 {
                if usize::from(x) * 10 + usize::from(y) < 65 {
                    surface.continue_stroke((x as f64, y as f64)).unwrap();
                }
            }
        }
        surface.end_stroke().unwrap();
        assert_eq!(surface.coverage(), 0.65);

        let mut reveals = 0;
        for _ in 0..3 {
            // overlapping debounced checks
            if surface.check_coverage().is_revealed() {
                reveals += 1;
                assert_eq!(rewards.mark_scratched("r1"), MarkOutcome::Changed);
            }
        }

        assert_eq!(reveals, 1);
        assert!(rewards.get(0).unwrap().scratched);
        assert!(!rewards.get(1).unwrap().scratched);
        assert_eq!(rewards.revealed_count(), 1);
    }

    #[test]
    fn keyboard_and_gesture_reveal_are_equivalent_downstream() {
        let mut rewards = two_rewards();

        let mut keyboard = ScratchSurface::new(SurfaceSpec::new((10, 10), 0, 0.60, 1));
        assert_eq!(keyboard.reveal(), ScratchOutcome::Revealed);
        assert_eq!(rewards.mark_scratched("r1"), MarkOutcome::Changed);

        let mut gesture = ScratchSurface::new(SurfaceSpec::new((10, 10), 9, 0.60, 1));
        gesture.begin_stroke((5.0, 5.0)).unwrap();
        gesture.end_stroke().unwrap();
        assert_eq!(gesture.check_coverage(), ScratchOutcome::Revealed);
        assert_eq!(rewards.mark_scratched("r2"), MarkOutcome::Changed);

        assert_eq!(
            rewards.get(0).unwrap().scratched,
            rewards.get(1).unwrap().scratched
        );
        assert!(rewards.all_revealed());
    }
}
