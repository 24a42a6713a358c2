use std::time::Instant;

use crate::model::{BidSuit, Card, Direction, HandResult};

use super::bridge_hand::{BridgeHand, HandRules};
use super::event::{Admission, Effect, GameEvent};
use super::state::GameState;

/// A session's run of hands at one table.
///
/// Owns the live [`BridgeHand`]. Finished or abandoned hands are kept on a
/// history stack for inspection; they are never replayed.
#[derive(Debug)]
pub struct Game {
    hand: BridgeHand,
    history: Vec<BridgeHand>,
    rules: HandRules,
    effects: Vec<Effect>,
}

impl Game {
    pub fn new(blind: Direction, rules: HandRules) -> Self {
        log::info!("New game, blind player at {}", blind);
        Self {
            hand: BridgeHand::new(blind, rules),
            history: Vec::new(),
            rules,
            effects: vec![Effect::SwitchAntenna(blind)],
        }
    }

    pub fn hand(&self) -> &BridgeHand {
        &self.hand
    }

    pub fn blind(&self) -> Direction {
        self.hand.blind()
    }

    pub fn rules(&self) -> &HandRules {
        &self.rules
    }

    /// Previous hands, oldest first
    pub fn history(&self) -> &[BridgeHand] {
        &self.history
    }

    pub fn hands_completed(&self) -> usize {
        self.history.iter().filter(|h| h.is_complete()).count()
    }

    pub fn last_result(&self) -> Option<HandResult> {
        self.history.iter().rev().find_map(|h| h.result())
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.collect();
        std::mem::take(&mut self.effects)
    }

    fn collect(&mut self) {
        let effects = self.hand.drain_effects();
        self.effects.extend(effects);
    }

    /// Run one operation on the live hand, then roll over to a new hand if
    /// that operation finished it.
    fn apply<T>(&mut self, op: impl FnOnce(&mut BridgeHand) -> T) -> T {
        let outcome = op(&mut self.hand);
        self.collect();
        if self.hand.is_complete() {
            self.start_new_hand();
        }
        outcome
    }

    fn start_new_hand(&mut self) {
        let blind = self.hand.blind();
        let previous = std::mem::replace(&mut self.hand, BridgeHand::new(blind, self.rules));
        self.history.push(previous);
        log::info!("Starting hand {}", self.history.len() + 1);
        self.effects.push(Effect::Notify(GameEvent::GameReset));
        self.effects.push(Effect::SwitchAntenna(blind));
    }

    /// Abandon the current hand and start over. Safe in any state.
    pub fn reset_game(&mut self) {
        self.collect();
        self.start_new_hand();
    }

    /// Move the blind player to another seat. Only while the blind hand is
    /// still being scanned; the cards scanned so far are discarded.
    pub fn set_blind_position(&mut self, blind: Direction) -> bool {
        if self.hand.state() != GameState::Dealing {
            log::warn!("Blind position can only change while dealing");
            return false;
        }
        self.collect();
        let contract = *self.hand.contract();
        self.hand = BridgeHand::new(blind, self.rules);
        if let Some(declarer) = contract.bid_winner {
            self.hand.set_declarer(declarer);
        }
        if let Some(level) = contract.level {
            self.hand.set_contract_level(level);
        }
        if let Some(trump) = contract.trump {
            self.hand.set_trump(trump);
        }
        log::info!("Blind player moved to {}", blind);
        self.collect();
        self.effects.push(Effect::SwitchAntenna(blind));
        true
    }

    pub fn card_found(&mut self, direction: Direction, card: Card, now: Instant) -> Admission {
        self.apply(|hand| hand.card_found(direction, card, now))
    }

    /// A card recognised on the id antenna, independent of any seat.
    pub fn card_identified(&mut self, card: Card) {
        self.effects.push(Effect::Notify(GameEvent::CardIdentified(card)));
    }

    pub fn settle(&mut self, now: Instant) -> bool {
        self.apply(|hand| hand.settle(now))
    }

    pub fn play_blind_card(&mut self) -> Admission {
        self.apply(|hand| hand.play_blind_card())
    }

    pub fn set_declarer(&mut self, declarer: Direction) -> bool {
        self.apply(|hand| hand.set_declarer(declarer))
    }

    pub fn set_contract_level(&mut self, level: u8) -> bool {
        self.apply(|hand| hand.set_contract_level(level))
    }

    pub fn set_trump(&mut self, trump: BidSuit) -> bool {
        self.apply(|hand| hand.set_trump(trump))
    }

    pub fn undo(&mut self) -> Option<Card> {
        self.apply(|hand| hand.undo())
    }

    pub fn undo_trick(&mut self) -> bool {
        self.apply(|hand| hand.undo_trick())
    }

    pub fn undo_blind_card(&mut self) -> Option<Card> {
        self.apply(|hand| hand.undo_blind_card())
    }

    pub fn undo_dummy_card(&mut self) -> Option<Card> {
        self.apply(|hand| hand.undo_dummy_card())
    }

    pub fn reverse_bid_position(&mut self) -> bool {
        self.apply(|hand| hand.reverse_bid_position())
    }
}
