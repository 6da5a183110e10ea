//! Step-wise battle resolution.
//!
//! [`Battle`] is a pure state machine: every call to [`Battle::step`] resolves
//! exactly one renderable event and returns it. The async runtime decides how
//! long to wait between steps and whether anyone is still watching; the rules
//! live here.
//!
//! # Exchange Flow
//!
//! ```text
//! begin:    front = first living member of each side, used skills reset
//! per turn: Preparing ─► Action ─► (Heal)
//! end:      sequence exhausted or a front member fell
//! ```

use std::collections::BTreeSet;

use crate::combat::{AttackResult, resolve_attack};
use crate::config::GameConfig;
use crate::rng::LehmerRng;
use crate::skills::{SkillCatalog, SkillContext, SkillKey};

use super::turns::{TurnSequence, combo_index, turn_sequence};
use super::{Effects, MemberView, PartyMember, PartySide};

/// Outcome of a finished battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Winner {
    Party1,
    Party2,
    /// Neither side has a survivor, or the exchange cap was reached.
    Draw,
}

impl From<PartySide> for Winner {
    fn from(side: PartySide) -> Self {
        match side {
            PartySide::Party1 => Winner::Party1,
            PartySide::Party2 => Winner::Party2,
        }
    }
}

/// Skills a party already fired in the current exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsedSkills(BTreeSet<SkillKey>);

impl UsedSkills {
    pub fn is_used(&self, key: SkillKey) -> bool {
        self.0.contains(&key)
    }

    pub fn mark(&mut self, key: SkillKey) {
        self.0.insert(key);
    }

    pub fn reset(&mut self) {
        self.0.clear();
    }
}

/// What the attacker did on its turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    /// The attacker was stunned and spent the turn recovering.
    Recovered,
    Hit(AttackResult),
}

/// One renderable event of a battle.
///
/// Member views are taken right after the event was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStep {
    Preparing {
        attacker: MemberView,
        receiver: MemberView,
        combo: usize,
    },
    Action {
        attacker: MemberView,
        receiver: MemberView,
        combo: usize,
        outcome: ActionOutcome,
    },
    Heal {
        healer: MemberView,
        target: MemberView,
        amount: u32,
    },
}

/// Final state of a battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleResult {
    pub winner: Winner,
    pub exchanges: u32,
    pub party1: Vec<PartyMember>,
    pub party2: Vec<PartyMember>,
}

impl BattleResult {
    /// Living members of `side`, in party order.
    pub fn survivors(&self, side: PartySide) -> impl Iterator<Item = &PartyMember> {
        let party = match side {
            PartySide::Party1 => &self.party1,
            PartySide::Party2 => &self.party2,
        };
        party.iter().filter(|member| member.alive())
    }
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Prepare,
    Act { side: PartySide, combo: usize },
    HealCheck { side: PartySide, member: usize },
}

#[derive(Clone, Debug)]
struct Exchange {
    /// Index of the acting front member, per side.
    front: [usize; 2],
    turns: TurnSequence,
    index: usize,
    phase: Phase,
}

/// A battle between two parties.
#[derive(Clone, Debug)]
pub struct Battle {
    parties: [Vec<PartyMember>; 2],
    used: [UsedSkills; 2],
    rng: LehmerRng,
    config: GameConfig,
    exchange: Option<Exchange>,
    exchanges: u32,
}

impl Battle {
    /// Creates a battle. `seed` drives every skill chance roll.
    pub fn new(
        party1: Vec<PartyMember>,
        party2: Vec<PartyMember>,
        seed: &str,
        config: GameConfig,
    ) -> Self {
        Self {
            parties: [party1, party2],
            used: Default::default(),
            rng: LehmerRng::new(seed),
            config,
            exchange: None,
            exchanges: 0,
        }
    }

    pub fn party(&self, side: PartySide) -> &[PartyMember] {
        &self.parties[side.index()]
    }

    pub fn exchanges(&self) -> u32 {
        self.exchanges
    }

    /// Winner once the battle is decided, `None` while it is still running.
    pub fn outcome(&self) -> Option<Winner> {
        let alive = |side: PartySide| self.party(side).iter().any(PartyMember::alive);

        match (alive(PartySide::Party1), alive(PartySide::Party2)) {
            (true, true) if self.exchanges >= GameConfig::MAX_EXCHANGES => Some(Winner::Draw),
            (true, true) => None,
            (true, false) => Some(Winner::Party1),
            (false, true) => Some(Winner::Party2),
            (false, false) => Some(Winner::Draw),
        }
    }

    /// Resolves the next event, or `None` once the battle is decided.
    pub fn step(&mut self) -> Option<BattleStep> {
        loop {
            let mut exchange = match self.exchange.take() {
                Some(exchange) => exchange,
                None => self.begin_exchange()?,
            };

            match exchange.phase {
                Phase::Prepare => {
                    let Some(side) = exchange.turns.get(exchange.index).copied() else {
                        continue;
                    };
                    if !self.fronts_alive(&exchange.front) {
                        continue;
                    }

                    let combo = combo_index(exchange.index, exchange.turns.len());
                    let attacker = &self.party(side)[exchange.front[side.index()]];
                    let receiver = &self.party(side.opponent())[exchange.front[side.opponent().index()]];

                    if attacker.is_stunned() && combo > 1 {
                        exchange.index += 1;
                        self.exchange = Some(exchange);
                        continue;
                    }

                    let step = BattleStep::Preparing {
                        attacker: attacker.view(),
                        receiver: receiver.view(),
                        combo,
                    };
                    exchange.phase = Phase::Act { side, combo };
                    self.exchange = Some(exchange);
                    return Some(step);
                }
                Phase::Act { side, combo } => {
                    let member = exchange.front[side.index()];
                    let step = self.act(side, member, exchange.front[side.opponent().index()], combo);
                    exchange.phase = Phase::HealCheck { side, member };
                    self.exchange = Some(exchange);
                    return Some(step);
                }
                Phase::HealCheck { side, member } => {
                    exchange.index += 1;
                    exchange.phase = Phase::Prepare;
                    self.exchange = Some(exchange);
                    if let Some(step) = self.heal_check(side, member) {
                        return Some(step);
                    }
                }
            }
        }
    }

    /// Runs the battle to the end, discarding intermediate steps.
    pub fn resolve(mut self) -> BattleResult {
        while self.step().is_some() {}
        self.finish()
    }

    /// Consumes the battle. A battle stopped early is reported as a draw.
    pub fn finish(self) -> BattleResult {
        let winner = self.outcome().unwrap_or(Winner::Draw);
        let [party1, party2] = self.parties;
        BattleResult {
            winner,
            exchanges: self.exchanges,
            party1,
            party2,
        }
    }

    fn begin_exchange(&mut self) -> Option<Exchange> {
        if self.outcome().is_some() {
            return None;
        }

        let front = [
            self.front_index(PartySide::Party1)?,
            self.front_index(PartySide::Party2)?,
        ];
        let turns = turn_sequence(
            &self.parties[0][front[0]],
            &self.parties[1][front[1]],
        );

        self.used.iter_mut().for_each(UsedSkills::reset);
        self.exchanges += 1;

        Some(Exchange {
            front,
            turns,
            index: 0,
            phase: Phase::Prepare,
        })
    }

    fn front_index(&self, side: PartySide) -> Option<usize> {
        self.party(side).iter().position(PartyMember::alive)
    }

    fn fronts_alive(&self, front: &[usize; 2]) -> bool {
        self.parties[0][front[0]].alive() && self.parties[1][front[1]].alive()
    }

    fn act(&mut self, side: PartySide, attacker: usize, receiver: usize, combo: usize) -> BattleStep {
        let Self { parties, rng, .. } = self;
        let [party1, party2] = parties;
        let (own, other) = match side {
            PartySide::Party1 => (party1, party2),
            PartySide::Party2 => (party2, party1),
        };

        let attacker = &mut own[attacker];
        let mut receiver = receiver;
        let mut sneaky = false;

        if attacker.sneak_attack
            && let Some(last) = other.iter().rposition(PartyMember::alive)
        {
            receiver = last;
            sneaky = true;
        }
        let receiver = &mut other[receiver];

        if sneaky {
            attacker.effects.insert(Effects::SNEAKY);
            receiver.effects.insert(Effects::SNEAKY);
        }

        let outcome = if attacker.is_stunned() {
            attacker.effects.remove(Effects::STUNNED);
            ActionOutcome::Recovered
        } else {
            let result = resolve_attack(attacker, receiver, combo, rng);
            receiver.damage(result.damage);
            if result.stunned {
                receiver.effects.insert(Effects::STUNNED);
            }
            attacker.heal(result.lifesteal);
            ActionOutcome::Hit(result)
        };

        let step = BattleStep::Action {
            attacker: attacker.view(),
            receiver: receiver.view(),
            combo,
            outcome,
        };

        attacker.effects.remove(Effects::SNEAKY);
        receiver.effects.remove(Effects::SNEAKY);

        step
    }

    /// Lets the strongest living healer of `side` patch up `member` once per
    /// exchange when it dropped to the heal threshold.
    fn heal_check(&mut self, side: PartySide, member: usize) -> Option<BattleStep> {
        let party = &self.parties[side.index()];
        let target = &party[member];

        if !target.alive()
            || !target.is_hp_below_or_equals(self.config.heal_threshold_percent)
            || self.used[side.index()].is_used(SkillKey::Heal)
        {
            return None;
        }

        let (healer, level) = party
            .iter()
            .enumerate()
            .filter(|(_, ally)| ally.alive())
            .filter_map(|(index, ally)| ally.skill_level(SkillKey::Heal).map(|level| (index, level)))
            .fold(None, |best: Option<(usize, u8)>, (index, level)| match best {
                Some((_, best_level)) if best_level >= level => best,
                _ => Some((index, level)),
            })?;

        let ctx = SkillContext {
            level,
            attacking: &party[healer],
            damage: 0,
            combo: 0,
            roll: 0,
        };
        let amount = SkillCatalog::get(SkillKey::Heal)
            .activate(&ctx)
            .heal()
            .unwrap_or(0);

        self.used[side.index()].mark(SkillKey::Heal);

        let party = &mut self.parties[side.index()];
        party[member].heal(amount);

        Some(BattleStep::Heal {
            healer: party[healer].view(),
            target: party[member].view(),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::BattleStats;
    use crate::skills::{SkillLevel, SkillSet};

    fn stats(attack: u32, defense: u32, speed: u32, hp: u32) -> BattleStats {
        BattleStats {
            attack,
            defense,
            speed,
            hp,
            max_hp: hp,
            skills: SkillSet::new(),
            sneak_attack: false,
        }
    }

    fn member(side: PartySide, stats: BattleStats) -> PartyMember {
        PartyMember::new(side, None, stats)
    }

    fn with_skill(mut stats: BattleStats, key: SkillKey, level: u8) -> BattleStats {
        stats.skills.insert(key, SkillLevel::new(level));
        stats
    }

    fn battle(party1: Vec<BattleStats>, party2: Vec<BattleStats>) -> Battle {
        Battle::new(
            party1.into_iter().map(|s| member(PartySide::Party1, s)).collect(),
            party2.into_iter().map(|s| member(PartySide::Party2, s)).collect(),
            "test-battle",
            GameConfig::default(),
        )
    }

    fn collect(battle: &mut Battle) -> Vec<BattleStep> {
        std::iter::from_fn(|| battle.step()).collect()
    }

    #[test]
    fn party2_wins_when_party1_is_dead() {
        let mut dead = stats(5, 5, 5, 10);
        dead.hp = 0;
        let mut battle = battle(vec![dead], vec![stats(5, 5, 5, 10)]);

        assert!(battle.step().is_none());
        let result = battle.finish();
        assert_eq!(result.winner, Winner::Party2);
        assert_eq!(result.exchanges, 0);
    }

    #[test]
    fn mutual_wipe_is_a_draw() {
        let mut dead1 = stats(5, 5, 5, 10);
        dead1.hp = 0;
        let dead2 = dead1.clone();

        let result = battle(vec![dead1], vec![dead2]).resolve();
        assert_eq!(result.winner, Winner::Draw);
        assert_eq!(battle(vec![], vec![]).resolve().winner, Winner::Draw);
    }

    #[test]
    fn stronger_party_wins_and_frames_alternate() {
        let mut battle = battle(vec![stats(10, 0, 10, 20)], vec![stats(3, 0, 10, 20)]);
        let steps = collect(&mut battle);

        assert!(matches!(steps[0], BattleStep::Preparing { .. }));
        assert!(matches!(steps[1], BattleStep::Action { .. }));
        // tie goes to party2, so it opens the first exchange
        if let BattleStep::Preparing { attacker, .. } = &steps[0] {
            assert_eq!(attacker.side, PartySide::Party2);
        }

        let result = battle.finish();
        assert_eq!(result.winner, Winner::Party1);
        // two exchanges: party1 takes 3 twice, party2 takes 10 twice
        assert_eq!(result.party1[0].hp, 20 - 6);
        assert_eq!(result.party2[0].hp, 0);
    }

    #[test]
    fn double_speed_yields_four_turns_per_exchange() {
        let mut battle = battle(vec![stats(1, 0, 100, 1000)], vec![stats(1, 0, 50, 1000)]);
        let mut sides = Vec::new();
        while battle.exchanges() < 2 {
            if let Some(BattleStep::Action { attacker, .. }) = battle.step() {
                sides.push(attacker.side);
            }
        }
        assert_eq!(
            &sides[..4],
            [
                PartySide::Party1,
                PartySide::Party1,
                PartySide::Party1,
                PartySide::Party2
            ]
        );
    }

    #[test]
    fn high_defense_still_takes_one_damage() {
        let mut battle = battle(vec![stats(10, 0, 1, 20)], vec![stats(0, 15, 2, 3)]);
        let damages: Vec<u32> = collect(&mut battle)
            .into_iter()
            .filter_map(|step| match step {
                BattleStep::Action {
                    attacker,
                    outcome: ActionOutcome::Hit(result),
                    ..
                } if attacker.side == PartySide::Party1 => Some(result.damage),
                _ => None,
            })
            .collect();

        assert!(!damages.is_empty());
        assert!(damages.iter().all(|damage| *damage == 1));
        assert_eq!(battle.finish().winner, Winner::Party1);
    }

    #[test]
    fn next_member_steps_up_when_front_falls() {
        let result = battle(
            vec![stats(10, 0, 10, 30)],
            vec![stats(1, 0, 1, 5), stats(1, 0, 1, 5)],
        )
        .resolve();

        assert_eq!(result.winner, Winner::Party1);
        assert!(result.party2.iter().all(|m| !m.alive()));
        assert_eq!(result.survivors(PartySide::Party1).count(), 1);
    }

    #[test]
    fn sneak_attack_hits_the_backline() {
        let mut sneaky = stats(5, 0, 10, 50);
        sneaky.sneak_attack = true;
        let mut battle = battle(
            vec![sneaky],
            vec![stats(0, 0, 1, 20), stats(0, 0, 1, 20), stats(0, 0, 1, 20)],
        );

        let step = std::iter::from_fn(|| battle.step())
            .find(|step| matches!(step, BattleStep::Action { .. }));
        let Some(BattleStep::Action { attacker, receiver, .. }) = step else {
            panic!("expected an action");
        };
        assert!(attacker.effects.contains(Effects::SNEAKY));
        assert!(receiver.effects.contains(Effects::SNEAKY));
        assert_eq!(receiver.hp, 15);

        // flags do not outlive the action
        assert!(battle.party(PartySide::Party1)[0].effects.is_empty());
        assert_eq!(battle.party(PartySide::Party2)[2].hp, 15);
        assert_eq!(battle.party(PartySide::Party2)[0].hp, 20);
    }

    #[test]
    fn stunned_attacker_recovers_instead_of_attacking() {
        let mut p1 = member(PartySide::Party1, stats(5, 0, 1, 50));
        p1.effects.insert(Effects::STUNNED);
        let p2 = member(PartySide::Party2, stats(5, 0, 5, 50));
        let mut battle = Battle::new(vec![p1], vec![p2], "stun", GameConfig::default());

        let actions: Vec<(PartySide, ActionOutcome)> = collect(&mut battle)
            .into_iter()
            .filter_map(|step| match step {
                BattleStep::Action { attacker, outcome, .. } => Some((attacker.side, outcome)),
                _ => None,
            })
            .take(4)
            .collect();

        // party2 is 400% faster: three swings, then party1 spends its turn recovering
        assert_eq!(actions[3].0, PartySide::Party1);
        assert_eq!(actions[3].1, ActionOutcome::Recovered);
    }

    #[test]
    fn stunned_attacker_skips_combo_turns() {
        let mut battle = battle(vec![stats(1, 0, 100, 50)], vec![stats(1, 0, 10, 50)]);

        assert!(matches!(battle.step(), Some(BattleStep::Preparing { .. })));
        assert!(matches!(battle.step(), Some(BattleStep::Action { .. })));

        // stunned between turn 0 and the two combo swings
        battle.parties[0][0].effects.insert(Effects::STUNNED);

        let Some(BattleStep::Preparing { attacker, combo, .. }) = battle.step() else {
            panic!("expected the slower side to prepare");
        };
        assert_eq!(attacker.side, PartySide::Party2);
        assert_eq!(combo, 0);
        assert!(battle.party(PartySide::Party1)[0].is_stunned());
        assert_eq!(battle.exchanges(), 1);
    }

    #[test]
    fn healer_patches_low_ally_once_per_exchange() {
        let tank = stats(1, 0, 2, 100);
        let healer = with_skill(stats(1, 0, 1, 40), SkillKey::Heal, 3);
        let mut p1 = vec![member(PartySide::Party1, tank), member(PartySide::Party1, healer)];
        p1[0].hp = 30;
        let p2 = vec![member(PartySide::Party2, stats(2, 0, 2, 1000))];
        let mut battle = Battle::new(p1, p2, "heal", GameConfig::default());

        let mut heals_per_exchange = std::collections::BTreeMap::<u32, u32>::new();
        let mut amounts = Vec::new();
        for _ in 0..40 {
            let Some(step) = battle.step() else { break };
            if let BattleStep::Heal { target, amount, healer } = step {
                *heals_per_exchange.entry(battle.exchanges()).or_default() += 1;
                amounts.push(amount);
                assert_eq!(target.side, PartySide::Party1);
                assert_eq!(healer.side, PartySide::Party1);
            }
        }

        // round(40 × 25%) = 10
        assert!(amounts.iter().all(|amount| *amount == 10));
        assert!(heals_per_exchange.values().all(|count| *count == 1));
        assert!(!heals_per_exchange.is_empty());
    }

    #[test]
    fn highest_level_healer_is_chosen() {
        let weak = with_skill(stats(1, 0, 1, 100), SkillKey::Heal, 1);
        let strong = with_skill(stats(1, 0, 1, 100), SkillKey::Heal, 2);
        let mut p1 = vec![
            member(PartySide::Party1, weak),
            member(PartySide::Party1, strong),
        ];
        p1[0].hp = 20;
        let p2 = vec![member(PartySide::Party2, stats(1, 0, 1, 1000))];
        let mut battle = Battle::new(p1, p2, "healers", GameConfig::default());

        let heal = std::iter::from_fn(|| battle.step()).find_map(|step| match step {
            BattleStep::Heal { healer, amount, .. } => Some((healer, amount)),
            _ => None,
        });
        let Some((healer, amount)) = heal else {
            panic!("expected a heal");
        };
        assert_eq!(healer.hp, 100);
        // level 2: round(100 × 15%) = 15
        assert_eq!(amount, 15);
    }

    #[test]
    fn endless_stalemate_ends_in_draw() {
        let healer = |side| member(side, with_skill(stats(0, 10, 1, 400), SkillKey::Heal, 3));
        let mut p1 = healer(PartySide::Party1);
        let mut p2 = healer(PartySide::Party2);
        p1.hp = 50;
        p2.hp = 50;

        let result = Battle::new(vec![p1], vec![p2], "stalemate", GameConfig::default()).resolve();
        assert_eq!(result.winner, Winner::Draw);
        assert_eq!(result.exchanges, GameConfig::MAX_EXCHANGES);
    }

    #[test]
    fn same_seed_replays_identically() {
        let skilled = |side| {
            let s = with_skill(stats(6, 1, 4, 60), SkillKey::Crit, 3);
            member(side, with_skill(s, SkillKey::Stun, 3))
        };
        let run = || {
            let mut battle = Battle::new(
                vec![skilled(PartySide::Party1)],
                vec![skilled(PartySide::Party2)],
                "replay",
                GameConfig::default(),
            );
            collect(&mut battle)
        };
        assert_eq!(run(), run());
    }
}
