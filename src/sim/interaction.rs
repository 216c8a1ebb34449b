//! Rock-paper-scissors interaction rules
//!
//! Resolution is split in two: `resolve` looks at a pair and says what should
//! happen, `apply_loss` produces the loser's replacement entry. The engine
//! decides when to commit those results, so nothing here touches the
//! population directly.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, ItemKind};
use crate::config::LossPolicy;

/// Winner of a kind-vs-kind matchup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Tie,
    FirstWins,
    SecondWins,
}

/// Precedence: rock > scissors > paper > rock
pub fn outcome(first: ItemKind, second: ItemKind) -> Outcome {
    if first.beats(second) {
        Outcome::FirstWins
    } else if second.beats(first) {
        Outcome::SecondWins
    } else {
        Outcome::Tie
    }
}

/// What happens to the loser of a decisive collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LossEffect {
    /// Survived with `remaining` lives
    LifeLost { remaining: u32 },
    /// Ran out of lives; leaves the arena at the end of the pass
    Eliminated,
    /// Took on the winner's kind
    Converted { from: ItemKind, to: ItemKind },
}

/// A decisive collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub winner: EntityId,
    pub loser: EntityId,
    pub effect: LossEffect,
}

/// Decide the outcome for two overlapping entities
///
/// Returns `None` for same-kind pairs. The result does not depend on
/// argument order.
pub fn resolve(a: &Entity, b: &Entity, policy: LossPolicy) -> Option<Resolution> {
    let (winner, loser) = match outcome(a.kind, b.kind) {
        Outcome::Tie => return None,
        Outcome::FirstWins => (a, b),
        Outcome::SecondWins => (b, a),
    };

    let effect = match policy {
        LossPolicy::Eliminate => match loser.lives.saturating_sub(1) {
            0 => LossEffect::Eliminated,
            remaining => LossEffect::LifeLost { remaining },
        },
        LossPolicy::Convert => LossEffect::Converted {
            from: loser.kind,
            to: winner.kind,
        },
    };

    Some(Resolution {
        winner: winner.id,
        loser: loser.id,
        effect,
    })
}

/// Replacement entry for the loser, or `None` once it is out of lives
pub fn apply_loss(loser: &Entity, effect: LossEffect) -> Option<Entity> {
    match effect {
        LossEffect::LifeLost { remaining } => Some(Entity {
            lives: remaining,
            ..*loser
        }),
        LossEffect::Eliminated => None,
        LossEffect::Converted { to, .. } => Some(Entity { kind: to, ..*loser }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::CellCoord;
    use glam::DVec2;

    fn entity(id: u64, kind: ItemKind, lives: u32) -> Entity {
        Entity::new(
            EntityId(id),
            DVec2::ZERO,
            DVec2::X,
            1.0,
            1.0,
            kind,
            CellCoord::default(),
            lives,
        )
    }

    #[test]
    fn test_outcome_table() {
        use ItemKind::*;
        assert_eq!(outcome(Rock, Scissors), Outcome::FirstWins);
        assert_eq!(outcome(Scissors, Rock), Outcome::SecondWins);
        assert_eq!(outcome(Scissors, Paper), Outcome::FirstWins);
        assert_eq!(outcome(Rock, Paper), Outcome::SecondWins);
        for kind in ItemKind::ALL {
            assert_eq!(outcome(kind, kind), Outcome::Tie);
        }
    }

    #[test]
    fn test_same_kind_has_no_effect() {
        let a = entity(1, ItemKind::Paper, 1);
        let b = entity(2, ItemKind::Paper, 1);
        assert_eq!(resolve(&a, &b, LossPolicy::Eliminate), None);
        assert_eq!(resolve(&a, &b, LossPolicy::Convert), None);
    }

    #[test]
    fn test_single_life_loser_is_eliminated() {
        let rock = entity(1, ItemKind::Rock, 1);
        let scissors = entity(2, ItemKind::Scissors, 1);
        let res = resolve(&rock, &scissors, LossPolicy::Eliminate).unwrap();
        assert_eq!(res.winner, rock.id);
        assert_eq!(res.loser, scissors.id);
        assert_eq!(res.effect, LossEffect::Eliminated);
        assert_eq!(apply_loss(&scissors, res.effect), None);
    }

    #[test]
    fn test_multi_life_loser_survives() {
        let rock = entity(1, ItemKind::Rock, 3);
        let scissors = entity(2, ItemKind::Scissors, 3);
        let res = resolve(&rock, &scissors, LossPolicy::Eliminate).unwrap();
        assert_eq!(res.effect, LossEffect::LifeLost { remaining: 2 });
        let after = apply_loss(&scissors, res.effect).unwrap();
        assert_eq!(after.lives, 2);
        assert_eq!(after.kind, ItemKind::Scissors);
        assert_eq!(after.pos, scissors.pos);
    }

    #[test]
    fn test_resolution_is_order_independent() {
        for policy in [LossPolicy::Eliminate, LossPolicy::Convert] {
            for a_kind in ItemKind::ALL {
                for b_kind in ItemKind::ALL {
                    let a = entity(1, a_kind, 2);
                    let b = entity(2, b_kind, 2);
                    assert_eq!(resolve(&a, &b, policy), resolve(&b, &a, policy));
                }
            }
        }
    }

    #[test]
    fn test_convert_policy_changes_kind() {
        let paper = entity(1, ItemKind::Paper, 1);
        let rock = entity(2, ItemKind::Rock, 1);
        let res = resolve(&paper, &rock, LossPolicy::Convert).unwrap();
        assert_eq!(res.loser, rock.id);
        assert_eq!(
            res.effect,
            LossEffect::Converted {
                from: ItemKind::Rock,
                to: ItemKind::Paper
            }
        );
        let after = apply_loss(&rock, res.effect).unwrap();
        assert_eq!(after.kind, ItemKind::Paper);
        assert_eq!(after.lives, 1);
    }
}
