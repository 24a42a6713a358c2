//! The per-hand state machine.
//!
//! [`BridgeHand`] turns a stream of "card seen on antenna X" reads and keypad
//! operations into the progression of one hand: scanning the blind player's
//! cards, the opening lead, scanning the dummy, and thirteen tricks. It does no
//! I/O. Notifications and antenna hand-offs are queued as [`Effect`]s in the
//! order they were decided and collected with [`BridgeHand::drain_effects`].

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::config::defaults::{DUMMY_SETTLE_DELAY, TRICKS_IN_HAND};
use crate::model::{BidSuit, Card, Contract, Direction, HandResult, Player, Seats, Trick};

use super::event::{Admission, Effect, GameEvent, IgnoreReason};
use super::state::GameState;

/// Table rules that stay fixed for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandRules {
    /// Quiet window after the dummy's thirteenth card before play resumes
    pub settle_delay: Duration,
    /// Blind player's reads are announced and only played on keypad confirmation
    pub confirm_blind_play: bool,
}

impl Default for HandRules {
    fn default() -> Self {
        Self {
            settle_delay: DUMMY_SETTLE_DELAY,
            confirm_blind_play: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BridgeHand {
    players: Seats<Player>,
    blind: Direction,
    dummy: Option<Direction>,
    turn: Option<Direction>,
    last_winner: Option<Direction>,
    trick: Trick,
    tricks_played: u8,
    contract: Contract,
    state: GameState,
    /// Every card played so far this hand
    cards_played: HashSet<Card>,
    pending_blind_card: Option<Card>,
    settle_deadline: Option<Instant>,
    result: Option<HandResult>,
    rules: HandRules,
    effects: Vec<Effect>,
}

impl BridgeHand {
    pub fn new(blind: Direction, rules: HandRules) -> Self {
        let mut players: Seats<Player> = Seats::default();
        players[blind].is_blind = true;
        Self {
            players,
            blind,
            dummy: None,
            turn: None,
            last_winner: None,
            trick: Trick::new(),
            tricks_played: 0,
            contract: Contract::default(),
            state: GameState::Dealing,
            cards_played: HashSet::new(),
            pending_blind_card: None,
            settle_deadline: None,
            result: None,
            rules,
            effects: Vec::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn blind(&self) -> Direction {
        self.blind
    }

    pub fn dummy(&self) -> Option<Direction> {
        self.dummy
    }

    pub fn turn(&self) -> Option<Direction> {
        self.turn
    }

    pub fn last_winner(&self) -> Option<Direction> {
        self.last_winner
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn current_trick(&self) -> &Trick {
        &self.trick
    }

    pub fn player(&self, seat: Direction) -> &Player {
        &self.players[seat]
    }

    pub fn players(&self) -> &Seats<Player> {
        &self.players
    }

    pub fn tricks_played(&self) -> u8 {
        self.tricks_played
    }

    pub fn tricks_won(&self, seat: Direction) -> u8 {
        self.players[seat].tricks_won
    }

    pub fn is_played(&self, card: &Card) -> bool {
        self.cards_played.contains(card)
    }

    pub fn pending_blind_card(&self) -> Option<Card> {
        self.pending_blind_card
    }

    pub fn settle_deadline(&self) -> Option<Instant> {
        self.settle_deadline
    }

    pub fn rules(&self) -> &HandRules {
        &self.rules
    }

    /// The outcome, once the thirteenth trick has been resolved
    pub fn result(&self) -> Option<HandResult> {
        self.result
    }

    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    /// Take every queued effect, oldest first.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    fn notify(&mut self, event: GameEvent) {
        self.effects.push(Effect::Notify(event));
    }

    fn switch_antenna(&mut self, seat: Direction) {
        self.effects.push(Effect::SwitchAntenna(seat));
    }

    fn debug_msg(&mut self, msg: String) {
        self.notify(GameEvent::Debug(msg));
    }

    fn ignore(&mut self, direction: Direction, card: Card, reason: IgnoreReason) -> Admission {
        if reason == IgnoreReason::WrongAntenna {
            log::trace!("{} on {} antenna ignored", card, direction);
        } else {
            log::debug!("{} on {} antenna ignored: {}", card, direction, reason);
            self.debug_msg(format!("{} from {} ignored: {}", card, direction, reason));
        }
        Admission::Ignored(reason)
    }

    /// Admit one antenna read. This is the only way cards enter the hand.
    ///
    /// `now` is compared against the settle deadline; a read arriving after
    /// the deadline first completes the move to play.
    pub fn card_found(&mut self, direction: Direction, card: Card, now: Instant) -> Admission {
        if self.is_complete() {
            return self.ignore(direction, card, IgnoreReason::NotReady);
        }
        if self.settle_deadline.is_some() && !self.settle(now) {
            return self.ignore(direction, card, IgnoreReason::Settling);
        }
        match self.state {
            GameState::Dealing => self.card_found_dealing(direction, card),
            GameState::FirstCard => self.card_found_first_card(direction, card),
            GameState::ScanningDummy => self.card_found_scanning_dummy(direction, card, now),
            GameState::Playing => self.card_found_playing(direction, card),
        }
    }

    fn card_found_dealing(&mut self, direction: Direction, card: Card) -> Admission {
        if direction != self.blind {
            return self.ignore(direction, card, IgnoreReason::WrongAntenna);
        }
        let admission = self.scan_into_hand(self.blind, card);
        if admission == Admission::Scanned && self.players[self.blind].has_full_hand() {
            log::info!("Blind hand at {} is complete", self.blind);
            self.state = GameState::FirstCard;
            self.notify(GameEvent::BlindHandScanned);
            if let Some(leader) = self.turn {
                self.switch_antenna(leader);
            }
        }
        admission
    }

    fn card_found_first_card(&mut self, direction: Direction, card: Card) -> Admission {
        if self.dummy.is_none() {
            return self.ignore(direction, card, IgnoreReason::NotReady);
        }
        if self.turn != Some(direction) {
            return self.ignore(direction, card, IgnoreReason::WrongAntenna);
        }
        self.admit_play(direction, card, false)
    }

    fn card_found_scanning_dummy(
        &mut self,
        direction: Direction,
        card: Card,
        now: Instant,
    ) -> Admission {
        let dummy = match self.dummy {
            Some(dummy) => dummy,
            None => return self.ignore(direction, card, IgnoreReason::NotReady),
        };
        if direction != dummy {
            return self.ignore(direction, card, IgnoreReason::WrongAntenna);
        }
        let admission = self.scan_into_hand(dummy, card);
        if admission == Admission::Scanned && self.players[dummy].has_full_hand() {
            log::info!("Dummy hand at {} is complete", dummy);
            self.notify(GameEvent::DummyHandScanned);
            if self.rules.settle_delay.is_zero() {
                self.state = GameState::Playing;
            } else {
                self.settle_deadline = Some(now + self.rules.settle_delay);
            }
        }
        admission
    }

    fn card_found_playing(&mut self, direction: Direction, card: Card) -> Admission {
        if self.turn != Some(direction) {
            return self.ignore(direction, card, IgnoreReason::WrongAntenna);
        }
        self.admit_play(direction, card, false)
    }

    /// Finish the dummy's quiet window if its deadline has passed.
    /// Returns true if play resumed.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.settle_deadline {
            Some(deadline) if now >= deadline => {
                self.settle_deadline = None;
                if self.state == GameState::ScanningDummy {
                    log::info!("Dummy settled, play resumes");
                    self.state = GameState::Playing;
                }
                true
            }
            _ => false,
        }
    }

    /// Add a scanned card to the blind or dummy hand.
    fn scan_into_hand(&mut self, seat: Direction, card: Card) -> Admission {
        if self.players[seat].hand.contains_card(&card) {
            return self.ignore(seat, card, IgnoreReason::AlreadyHeld);
        }
        let scanning_dummy = self.players[seat].is_dummy && !self.players[seat].is_blind;
        if scanning_dummy {
            // The opening lead and the blind hand both pass over the dummy antenna
            if self.players[self.blind].hand.contains_card(&card) {
                return self.ignore(seat, card, IgnoreReason::AlreadyHeld);
            }
            if self.cards_played.contains(&card) {
                return self.ignore(seat, card, IgnoreReason::AlreadyPlayed);
            }
        }
        if !self.players[seat].hand.add_card(card) {
            return self.ignore(seat, card, IgnoreReason::NotReady);
        }
        let hand_complete = self.players[seat].has_full_hand();
        log::debug!("Scanned {} into {} hand", card, seat);
        self.notify(GameEvent::CardScanned {
            direction: seat,
            card,
            hand_complete,
        });
        Admission::Scanned
    }

    fn needs_confirmation(&self, seat: Direction) -> bool {
        self.rules.confirm_blind_play && seat == self.blind && self.dummy != Some(self.blind)
    }

    fn admit_play(&mut self, seat: Direction, card: Card, confirmed: bool) -> Admission {
        if !confirmed && self.needs_confirmation(seat) {
            if self.cards_played.contains(&card) {
                return self.ignore(seat, card, IgnoreReason::AlreadyPlayed);
            }
            if self.pending_blind_card != Some(card) {
                self.pending_blind_card = Some(card);
                self.notify(GameEvent::CardIdentified(card));
            }
            return Admission::AwaitingConfirmation;
        }

        let admission = self.play_card(seat, card);
        if admission == Admission::Played {
            match self.state {
                GameState::FirstCard => self.finish_opening_lead(),
                GameState::Playing if self.trick.is_over() => self.end_trick(),
                _ => {}
            }
        }
        admission
    }

    /// Play `card` from `seat` into the current trick.
    fn play_card(&mut self, seat: Direction, card: Card) -> Admission {
        if self.cards_played.contains(&card) {
            return self.ignore(seat, card, IgnoreReason::AlreadyPlayed);
        }
        let new_trick = self.trick.is_empty() || self.trick.is_over();
        if !new_trick && self.trick.card(seat).is_some() {
            return self.ignore(seat, card, IgnoreReason::SeatAlreadyPlayed);
        }
        let led_suit = if new_trick { None } else { self.trick.led_suit() };

        if let Err(reason) = self.players[seat].check_play(&card, led_suit) {
            log::info!("{} may not play {}: {}", seat, card, reason);
            self.notify(GameEvent::InvalidPlay {
                direction: seat,
                card,
                reason,
            });
            return Admission::Rejected(reason);
        }

        if new_trick {
            self.trick = Trick::new();
        }
        self.cards_played.insert(card);
        self.players[seat].hand.remove_card(&card);
        self.trick.add(card, seat);
        if seat == self.blind {
            self.pending_blind_card = None;
        }
        log::info!("{} played {}", seat, card);
        self.notify(GameEvent::CardPlayed {
            direction: seat,
            card,
        });

        let next = seat.next();
        self.turn = Some(next);
        if !self.trick.is_over() {
            self.notify(GameEvent::NextPlayer(next));
            self.switch_antenna(next);
        }
        Admission::Played
    }

    fn finish_opening_lead(&mut self) {
        let dummy_ready = match self.dummy {
            Some(dummy) => dummy == self.blind || self.players[dummy].has_full_hand(),
            None => false,
        };
        if dummy_ready {
            self.notify(GameEvent::DummyHandScanned);
            self.state = GameState::Playing;
        } else {
            self.state = GameState::ScanningDummy;
        }
    }

    fn side_tricks(&self, seat: Direction) -> u8 {
        self.players[seat].tricks_won + self.players[seat.partner()].tricks_won
    }

    fn end_trick(&mut self) {
        let trump = match self.contract.trump {
            Some(trump) => trump,
            None => {
                log::warn!("No trump suit set, resolving trick as no trump");
                BidSuit::NoTrump
            }
        };
        let winner = match self.trick.determine_winner(trump) {
            Some(winner) => winner,
            None => {
                log::error!("Complete trick has no winner: {}", self.trick);
                return;
            }
        };

        self.trick.winner = Some(winner);
        self.players[winner].tricks_won += 1;
        self.last_winner = Some(winner);
        self.tricks_played += 1;
        self.turn = Some(winner);
        let tricks = self.side_tricks(winner);
        log::info!("{} wins trick {}: {}", winner, self.tricks_played, self.trick);

        if self.tricks_played < TRICKS_IN_HAND {
            self.switch_antenna(winner);
            self.notify(GameEvent::TrickWon { winner, tricks });
            self.notify(GameEvent::NextPlayer(winner));
        } else {
            self.notify(GameEvent::TrickWon { winner, tricks });
            self.finish_hand();
        }
    }

    fn finish_hand(&mut self) {
        let declarer = self.contract.bid_winner.unwrap_or(self.blind);
        let level = match self.contract.level {
            Some(level) => level,
            None => {
                log::warn!("No contract level set, judging the hand as a one-level contract");
                1
            }
        };
        let result = HandResult::new(
            declarer,
            level,
            self.side_tricks(declarer),
            self.side_tricks(declarer.next()),
        );
        log::info!(
            "Hand over: {} {} with {} tricks",
            declarer,
            if result.made { "made" } else { "went down" },
            result.declarer_tricks
        );
        self.state = GameState::Dealing;
        self.turn = None;
        self.result = Some(result);
        self.notify(GameEvent::HandComplete(result));
    }

    /// Play the blind player's announced card (keypad confirmation).
    pub fn play_blind_card(&mut self) -> Admission {
        let card = match self.pending_blind_card {
            Some(card) => card,
            None => return Admission::Ignored(IgnoreReason::NotReady),
        };
        let ready = matches!(self.state, GameState::FirstCard | GameState::Playing)
            && self.turn == Some(self.blind)
            && !self.is_complete();
        if !ready {
            return self.ignore(self.blind, card, IgnoreReason::NotReady);
        }
        let admission = self.admit_play(self.blind, card, true);
        if let Admission::Rejected(_) = admission {
            self.pending_blind_card = None;
        }
        admission
    }

    fn announce_contract(&mut self) {
        if self.contract.is_complete() {
            self.notify(GameEvent::ContractSet(self.contract));
        }
    }

    /// Record the declarer. The dummy is the declarer's partner and the
    /// opening lead comes from the declarer's left.
    ///
    /// Only allowed before the opening lead.
    pub fn set_declarer(&mut self, declarer: Direction) -> bool {
        let before_lead = matches!(self.state, GameState::Dealing | GameState::FirstCard)
            && self.cards_played.is_empty()
            && !self.is_complete();
        if !before_lead {
            log::warn!("Declarer can only be set before the opening lead");
            return false;
        }
        let dummy = declarer.partner();
        if let Some(old) = self.dummy {
            self.players[old].is_dummy = false;
            // Cards scanned for a dummy that no longer is one must not be enforced
            if old != dummy && old != self.blind {
                self.players[old].new_hand();
            }
        }
        let leader = declarer.next();
        self.contract.bid_winner = Some(declarer);
        self.dummy = Some(dummy);
        self.players[dummy].is_dummy = true;
        self.turn = Some(leader);
        log::info!("Declarer {}, dummy {}, {} leads", declarer, dummy, leader);

        self.notify(GameEvent::DummyPosition(dummy));
        self.notify(GameEvent::NextPlayer(leader));
        // While still dealing, listening stays on the blind antenna
        if self.state == GameState::FirstCard {
            self.switch_antenna(leader);
        }
        self.announce_contract();
        true
    }

    pub fn set_contract_level(&mut self, level: u8) -> bool {
        if self.is_complete() || !self.contract.set_level(level) {
            log::warn!("Contract level {} not accepted", level);
            return false;
        }
        self.announce_contract();
        true
    }

    pub fn set_trump(&mut self, trump: BidSuit) -> bool {
        if self.is_complete() {
            return false;
        }
        self.contract.trump = Some(trump);
        self.announce_contract();
        true
    }

    fn return_card(&mut self, seat: Direction, card: Card) {
        self.cards_played.remove(&card);
        // Sighted seats were never scanned, so they hold nothing to return to
        if self.players[seat].is_tracked() {
            self.players[seat].hand.add_card(card);
        }
    }

    fn reopen_first_card(&mut self) {
        log::info!("Opening lead taken back");
        self.state = GameState::FirstCard;
        self.settle_deadline = None;
    }

    fn opening_leader(&self) -> Option<Direction> {
        self.contract.bid_winner.map(|declarer| declarer.next())
    }

    /// Take back the last card played to the current trick.
    ///
    /// Does nothing on an empty or already resolved trick.
    pub fn undo(&mut self) -> Option<Card> {
        if self.trick.is_empty() || self.trick.is_over() {
            return None;
        }
        let seat = self.turn?.prev();
        let card = self.trick.clear_card(seat)?;
        self.return_card(seat, card);
        log::info!("Undo: {} takes back {}", seat, card);
        if self.trick.is_empty() && self.state == GameState::ScanningDummy {
            self.reopen_first_card();
        }
        self.turn = Some(seat);
        self.notify(GameEvent::NextPlayer(seat));
        self.switch_antenna(seat);
        Some(card)
    }

    /// Take back every card of an unfinished trick and hand the lead back.
    pub fn undo_trick(&mut self) -> bool {
        if self.trick.is_empty() || self.trick.is_over() {
            return false;
        }
        let plays: Vec<(Direction, Card)> = self.trick.plays().collect();
        for (seat, card) in plays {
            self.return_card(seat, card);
        }
        self.trick = Trick::new();
        if self.state == GameState::ScanningDummy {
            self.reopen_first_card();
        }
        let leader = self
            .last_winner
            .or_else(|| self.opening_leader())
            .unwrap_or(self.blind);
        log::info!("Undo trick: {} to lead", leader);
        self.turn = Some(leader);
        self.notify(GameEvent::NextPlayer(leader));
        self.switch_antenna(leader);
        true
    }

    /// Remove the most recently scanned card from the blind hand.
    pub fn undo_blind_card(&mut self) -> Option<Card> {
        let scanning = matches!(self.state, GameState::Dealing | GameState::FirstCard)
            && self.cards_played.is_empty();
        if !scanning {
            return None;
        }
        let card = self.players[self.blind].hand.remove_recent_card()?;
        self.debug_msg(format!("Removed {} from blind hand", card));
        if self.state == GameState::FirstCard {
            self.state = GameState::Dealing;
            self.switch_antenna(self.blind);
        }
        Some(card)
    }

    /// Remove the most recently scanned card from the dummy hand.
    pub fn undo_dummy_card(&mut self) -> Option<Card> {
        if self.state != GameState::ScanningDummy {
            return None;
        }
        let dummy = self.dummy?;
        let card = self.players[dummy].hand.remove_recent_card()?;
        self.settle_deadline = None;
        self.debug_msg(format!("Removed {} from dummy hand", card));
        Some(card)
    }

    /// Start the bidding over: the blind hand is rescanned and the declarer
    /// entered again.
    pub fn reverse_bid_position(&mut self) -> bool {
        if !self.cards_played.is_empty() || self.is_complete() {
            return false;
        }
        if let Some(dummy) = self.dummy.take() {
            self.players[dummy].is_dummy = false;
        }
        self.players[self.blind].new_hand();
        self.contract = Contract::default();
        self.turn = None;
        self.pending_blind_card = None;
        self.state = GameState::Dealing;
        log::info!("Bid reversed, rescanning blind hand at {}", self.blind);
        self.switch_antenna(self.blind);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Rank, Rejection, Suit};

    fn card(code: &str) -> Card {
        Card::from_code(code).unwrap()
    }

    /// Each seat holds one whole suit.
    fn suit_at(seat: Direction) -> Suit {
        match seat {
            Direction::North => Suit::Spades,
            Direction::East => Suit::Hearts,
            Direction::South => Suit::Diamonds,
            Direction::West => Suit::Clubs,
        }
    }

    fn whole_suit(suit: Suit) -> Vec<Card> {
        Rank::ALL.iter().map(|&rank| Card::new(rank, suit)).collect()
    }

    fn no_settle() -> HandRules {
        HandRules {
            settle_delay: Duration::ZERO,
            confirm_blind_play: false,
        }
    }

    fn events(effects: &[Effect]) -> Vec<GameEvent> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    fn switches(effects: &[Effect]) -> Vec<Direction> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::SwitchAntenna(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    fn scan_suit(hand: &mut BridgeHand, seat: Direction, now: Instant) {
        for c in whole_suit(suit_at(seat)) {
            hand.card_found(seat, c, now);
        }
    }

    /// Blind North scanned, North declares 4♠, East on lead.
    fn ready_for_lead(rules: HandRules, now: Instant) -> BridgeHand {
        let mut hand = BridgeHand::new(Direction::North, rules);
        scan_suit(&mut hand, Direction::North, now);
        hand.set_declarer(Direction::North);
        hand.set_contract_level(4);
        hand.set_trump(BidSuit::Spades);
        hand.drain_effects();
        hand
    }

    /// Opening lead 2♥ from East, dummy South scanned and settled.
    fn in_play(rules: HandRules, now: Instant) -> BridgeHand {
        let mut hand = ready_for_lead(rules, now);
        hand.card_found(Direction::East, card("2H"), now);
        scan_suit(&mut hand, Direction::South, now);
        hand.settle(now + rules.settle_delay);
        hand.drain_effects();
        hand
    }

    #[test]
    fn test_blind_hand_fills_then_first_card() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::North, HandRules::default());
        scan_suit(&mut hand, Direction::North, now);
        assert_eq!(hand.state(), GameState::FirstCard);
        assert_eq!(hand.player(Direction::North).hand.len(), 13);
        for c in whole_suit(Suit::Spades) {
            assert!(hand.player(Direction::North).hand.contains_card(&c));
        }
        let effects = hand.drain_effects();
        let completions = events(&effects)
            .into_iter()
            .filter(|e| *e == GameEvent::BlindHandScanned)
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_duplicate_scan_while_dealing_is_noop() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::West, HandRules::default());
        assert_eq!(hand.card_found(Direction::West, card("7C"), now), Admission::Scanned);
        assert_eq!(
            hand.card_found(Direction::West, card("7C"), now),
            Admission::Ignored(IgnoreReason::AlreadyHeld)
        );
        assert_eq!(hand.player(Direction::West).hand.len(), 1);
    }

    #[test]
    fn test_other_antennas_ignored_while_dealing() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::West, HandRules::default());
        assert_eq!(
            hand.card_found(Direction::North, card("7C"), now),
            Admission::Ignored(IgnoreReason::WrongAntenna)
        );
        assert!(hand.player(Direction::North).hand.is_empty());
        assert!(hand.drain_effects().is_empty());
    }

    #[test]
    fn test_first_card_needs_declarer() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::North, HandRules::default());
        scan_suit(&mut hand, Direction::North, now);
        assert_eq!(
            hand.card_found(Direction::East, card("2H"), now),
            Admission::Ignored(IgnoreReason::NotReady)
        );
        assert!(hand.current_trick().is_empty());
    }

    #[test]
    fn test_set_declarer_during_first_card_moves_antenna() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::North, HandRules::default());
        scan_suit(&mut hand, Direction::North, now);
        hand.drain_effects();
        assert!(hand.set_declarer(Direction::North));
        assert_eq!(hand.dummy(), Some(Direction::South));
        assert_eq!(hand.turn(), Some(Direction::East));
        assert!(hand.player(Direction::South).is_dummy);
        let effects = hand.drain_effects();
        assert_eq!(switches(&effects), vec![Direction::East]);
        assert!(events(&effects).contains(&GameEvent::DummyPosition(Direction::South)));
    }

    #[test]
    fn test_declarer_during_dealing_keeps_blind_antenna() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::North, HandRules::default());
        hand.set_declarer(Direction::South);
        assert!(switches(&hand.drain_effects()).is_empty());
        scan_suit(&mut hand, Direction::North, now);
        // North is both blind and dummy, West leads
        assert!(hand.player(Direction::North).is_dummy);
        assert_eq!(switches(&hand.drain_effects()), vec![Direction::West]);
    }

    #[test]
    fn test_contract_set_when_complete() {
        let mut hand = BridgeHand::new(Direction::North, HandRules::default());
        hand.set_trump(BidSuit::Hearts);
        hand.set_declarer(Direction::South);
        assert!(!events(&hand.drain_effects())
            .iter()
            .any(|e| matches!(e, GameEvent::ContractSet(_))));
        assert!(!hand.set_contract_level(8));
        assert!(hand.set_contract_level(3));
        let effects = hand.drain_effects();
        assert_eq!(
            events(&effects),
            vec![GameEvent::ContractSet(Contract::new(
                Direction::South,
                BidSuit::Hearts,
                3
            ))]
        );
    }

    #[test]
    fn test_opening_lead_then_scanning_dummy() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        assert_eq!(hand.state(), GameState::FirstCard);
        assert_eq!(
            hand.card_found(Direction::South, card("2D"), now),
            Admission::Ignored(IgnoreReason::WrongAntenna)
        );
        assert_eq!(hand.card_found(Direction::East, card("2H"), now), Admission::Played);
        assert_eq!(hand.state(), GameState::ScanningDummy);
        assert_eq!(hand.turn(), Some(Direction::South));
        let effects = hand.drain_effects();
        assert_eq!(switches(&effects), vec![Direction::South]);
        assert!(events(&effects).contains(&GameEvent::CardPlayed {
            direction: Direction::East,
            card: card("2H"),
        }));
    }

    #[test]
    fn test_dummy_scan_settles_into_play() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        hand.card_found(Direction::East, card("2H"), now);
        // The opening lead lingering over the dummy antenna is not scanned
        assert_eq!(
            hand.card_found(Direction::South, card("2H"), now),
            Admission::Ignored(IgnoreReason::AlreadyPlayed)
        );
        assert_eq!(
            hand.card_found(Direction::South, card("AS"), now),
            Admission::Ignored(IgnoreReason::AlreadyHeld)
        );
        scan_suit(&mut hand, Direction::South, now);
        assert_eq!(hand.player(Direction::South).hand.len(), 13);
        assert_eq!(hand.state(), GameState::ScanningDummy);
        assert!(events(&hand.drain_effects()).contains(&GameEvent::DummyHandScanned));

        let deadline = now + DUMMY_SETTLE_DELAY;
        assert_eq!(hand.settle_deadline(), Some(deadline));
        assert_eq!(
            hand.card_found(Direction::South, card("AD"), now + Duration::from_millis(10)),
            Admission::Ignored(IgnoreReason::Settling)
        );
        assert!(!hand.settle(now + Duration::from_millis(999)));
        assert!(hand.settle(deadline));
        assert_eq!(hand.state(), GameState::Playing);
        assert_eq!(hand.settle_deadline(), None);
    }

    #[test]
    fn test_late_read_completes_settle() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        hand.card_found(Direction::East, card("2H"), now);
        scan_suit(&mut hand, Direction::South, now);
        let later = now + Duration::from_secs(2);
        assert_eq!(hand.card_found(Direction::South, card("AD"), later), Admission::Played);
        assert_eq!(hand.state(), GameState::Playing);
    }

    #[test]
    fn test_zero_settle_delay_plays_immediately() {
        let now = Instant::now();
        let mut hand = ready_for_lead(no_settle(), now);
        hand.card_found(Direction::East, card("2H"), now);
        scan_suit(&mut hand, Direction::South, now);
        assert_eq!(hand.state(), GameState::Playing);
        assert_eq!(hand.settle_deadline(), None);
    }

    #[test]
    fn test_blind_dummy_skips_dummy_scan() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::North, HandRules::default());
        scan_suit(&mut hand, Direction::North, now);
        hand.set_declarer(Direction::South);
        assert_eq!(hand.dummy(), Some(Direction::North));
        assert_eq!(hand.turn(), Some(Direction::West));
        hand.drain_effects();
        assert_eq!(hand.card_found(Direction::West, card("3C"), now), Admission::Played);
        assert_eq!(hand.state(), GameState::Playing);
        assert!(events(&hand.drain_effects()).contains(&GameEvent::DummyHandScanned));
    }

    #[test]
    fn test_repeated_read_plays_once() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        assert_eq!(hand.card_found(Direction::South, card("5D"), now), Admission::Played);
        assert_ne!(hand.card_found(Direction::South, card("5D"), now), Admission::Played);
        assert_eq!(hand.current_trick().len(), 2);
        assert_eq!(hand.current_trick().card(Direction::South), Some(card("5D")));
    }

    #[test]
    fn test_dummy_cannot_play_card_it_does_not_hold() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        assert_eq!(
            hand.card_found(Direction::South, card("KS"), now),
            Admission::Rejected(Rejection::NotInHand)
        );
        assert_eq!(hand.turn(), Some(Direction::South));
        assert_eq!(hand.current_trick().len(), 1);
        assert_eq!(hand.player(Direction::South).hand.len(), 13);
        let effects = hand.drain_effects();
        assert_eq!(
            events(&effects),
            vec![GameEvent::InvalidPlay {
                direction: Direction::South,
                card: card("KS"),
                reason: Rejection::NotInHand,
            }]
        );
        assert!(switches(&effects).is_empty());
    }

    #[test]
    fn test_blind_must_follow_suit() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::North, no_settle());
        for c in whole_suit(Suit::Spades).into_iter().skip(1) {
            hand.card_found(Direction::North, c, now);
        }
        hand.card_found(Direction::North, card("AH"), now);
        assert_eq!(hand.state(), GameState::FirstCard);
        hand.set_declarer(Direction::North);
        hand.set_contract_level(1);
        hand.set_trump(BidSuit::NoTrump);

        hand.card_found(Direction::East, card("2H"), now);
        scan_suit(&mut hand, Direction::South, now);
        assert_eq!(hand.card_found(Direction::South, card("2D"), now), Admission::Played);
        assert_eq!(hand.card_found(Direction::West, card("2C"), now), Admission::Played);
        assert_eq!(
            hand.card_found(Direction::North, card("AS"), now),
            Admission::Rejected(Rejection::MustFollowSuit(Suit::Hearts))
        );
        assert_eq!(hand.card_found(Direction::North, card("AH"), now), Admission::Played);
        assert_eq!(hand.current_trick().winner, Some(Direction::North));
        assert_eq!(hand.turn(), Some(Direction::North));
        assert_eq!(hand.tricks_won(Direction::North), 1);
    }

    #[test]
    fn test_single_trump_wins_trick() {
        let now = Instant::now();
        let mut hand = BridgeHand::new(Direction::North, no_settle());
        scan_suit(&mut hand, Direction::North, now);
        hand.set_declarer(Direction::North);
        hand.set_contract_level(2);
        hand.set_trump(BidSuit::Diamonds);
        hand.card_found(Direction::East, card("AH"), now);
        scan_suit(&mut hand, Direction::South, now);
        hand.card_found(Direction::South, card("2D"), now);
        hand.card_found(Direction::West, card("KH"), now);
        hand.drain_effects();
        hand.card_found(Direction::North, card("AS"), now);

        assert_eq!(hand.current_trick().winner, Some(Direction::South));
        let effects = hand.drain_effects();
        assert!(events(&effects).contains(&GameEvent::TrickWon {
            winner: Direction::South,
            tricks: 1,
        }));
        assert_eq!(switches(&effects), vec![Direction::South]);
        assert_eq!(hand.turn(), Some(Direction::South));
    }

    #[test]
    fn test_undo_on_empty_trick_is_noop() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        assert_eq!(hand.undo(), None);
        assert_eq!(hand.state(), GameState::FirstCard);
        assert_eq!(hand.turn(), Some(Direction::East));
        assert!(hand.drain_effects().is_empty());
    }

    #[test]
    fn test_undo_returns_card_to_hand() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        for (seat, code) in [
            (Direction::South, "2D"),
            (Direction::West, "2C"),
            (Direction::North, "2S"),
        ] {
            hand.card_found(seat, card(code), now);
        }
        assert_eq!(hand.turn(), Some(Direction::North));
        hand.card_found(Direction::North, card("AS"), now);
        assert_eq!(hand.current_trick().len(), 1);
        assert!(!hand.player(Direction::North).hand.contains_card(&card("AS")));

        assert_eq!(hand.undo(), Some(card("AS")));
        assert!(hand.current_trick().is_empty());
        assert!(hand.player(Direction::North).hand.contains_card(&card("AS")));
        assert!(!hand.is_played(&card("AS")));
        assert_eq!(hand.turn(), Some(Direction::North));
        // The card can be played again
        assert_eq!(hand.card_found(Direction::North, card("AS"), now), Admission::Played);
    }

    #[test]
    fn test_undo_does_not_give_sighted_seat_a_card() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        for (seat, code) in [
            (Direction::South, "2D"),
            (Direction::West, "2C"),
            (Direction::North, "2S"),
            (Direction::North, "3S"),
            (Direction::East, "4S"),
        ] {
            hand.card_found(seat, card(code), now);
        }
        assert_eq!(hand.undo(), Some(card("4S")));
        assert!(!hand.player(Direction::East).hand.contains_card(&card("4S")));
        assert!(!hand.is_played(&card("4S")));
        // East is free to discard, as nothing of theirs was ever scanned
        assert_eq!(hand.card_found(Direction::East, card("4C"), now), Admission::Played);
    }

    #[test]
    fn test_redeclare_clears_old_dummy_hand() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        hand.card_found(Direction::East, card("2H"), now);
        hand.card_found(Direction::South, card("AD"), now);
        hand.card_found(Direction::South, card("KD"), now);
        assert_eq!(hand.undo(), Some(card("2H")));

        assert!(hand.set_declarer(Direction::East));
        assert_eq!(hand.dummy(), Some(Direction::West));
        assert_eq!(hand.turn(), Some(Direction::South));
        assert!(!hand.player(Direction::South).is_dummy);
        assert!(hand.player(Direction::South).hand.is_empty());
        assert!(hand.player(Direction::East).hand.is_empty());
        // South may now lead a card that was scanned while they were dummy
        assert_eq!(hand.card_found(Direction::South, card("5C"), now), Admission::Played);
    }

    #[test]
    fn test_resolved_trick_is_not_undone() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        for (seat, code) in [
            (Direction::South, "2D"),
            (Direction::West, "2C"),
            (Direction::North, "2S"),
        ] {
            hand.card_found(seat, card(code), now);
        }
        assert!(hand.current_trick().is_over());
        assert_eq!(hand.undo(), None);
        assert!(!hand.undo_trick());
        assert_eq!(hand.tricks_won(Direction::North), 1);
    }

    #[test]
    fn test_undo_opening_lead_returns_to_first_card() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        hand.card_found(Direction::East, card("2H"), now);
        hand.card_found(Direction::South, card("AD"), now);
        assert_eq!(hand.undo(), Some(card("2H")));
        assert_eq!(hand.state(), GameState::FirstCard);
        assert_eq!(hand.turn(), Some(Direction::East));
        // Dummy cards scanned so far are kept
        assert!(hand.player(Direction::South).hand.contains_card(&card("AD")));
    }

    #[test]
    fn test_undo_trick_gives_lead_back() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        hand.card_found(Direction::South, card("3D"), now);
        hand.card_found(Direction::West, card("3C"), now);
        hand.drain_effects();
        assert!(hand.undo_trick());
        assert!(hand.current_trick().is_empty());
        assert_eq!(hand.turn(), Some(Direction::East));
        assert!(hand.player(Direction::South).hand.contains_card(&card("3D")));
        assert!(!hand.is_played(&card("2H")));
        assert_eq!(switches(&hand.drain_effects()), vec![Direction::East]);
        assert!(!hand.undo_trick());
    }

    #[test]
    fn test_undo_trick_after_first_trick_goes_to_winner() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        for (seat, code) in [
            (Direction::South, "2D"),
            (Direction::West, "2C"),
            (Direction::North, "2S"),
            (Direction::North, "AS"),
            (Direction::East, "AH"),
        ] {
            hand.card_found(seat, card(code), now);
        }
        assert!(hand.undo_trick());
        assert_eq!(hand.turn(), Some(Direction::North));
        assert!(hand.player(Direction::North).hand.contains_card(&card("AS")));
    }

    #[test]
    fn test_full_hand() {
        let now = Instant::now();
        let mut hand = in_play(no_settle(), now);
        let ranks = Rank::ALL;
        // Finish the first trick: East led the two of hearts
        for seat in [Direction::South, Direction::West, Direction::North] {
            let c = Card::new(ranks[0], suit_at(seat));
            assert_eq!(hand.card_found(seat, c, now), Admission::Played);
        }
        for rank in ranks.iter().skip(1) {
            for seat in Direction::ALL {
                let c = Card::new(*rank, suit_at(seat));
                assert_eq!(hand.card_found(seat, c, now), Admission::Played);
            }
        }
        assert!(hand.is_complete());
        assert_eq!(hand.state(), GameState::Dealing);
        assert_eq!(hand.tricks_played(), 13);
        assert_eq!(hand.tricks_won(Direction::North), 13);
        let result = hand.result().unwrap();
        assert!(result.made);
        assert_eq!(result.declarer_tricks, 13);
        assert_eq!(result.defender_tricks, 0);
        let effects = hand.drain_effects();
        assert_eq!(
            events(&effects).last(),
            Some(&GameEvent::HandComplete(result))
        );
        assert_eq!(
            hand.card_found(Direction::North, card("AS"), now),
            Admission::Ignored(IgnoreReason::NotReady)
        );
    }

    #[test]
    fn test_blind_play_waits_for_confirmation() {
        let now = Instant::now();
        let rules = HandRules {
            settle_delay: Duration::ZERO,
            confirm_blind_play: true,
        };
        let mut hand = in_play(rules, now);
        hand.card_found(Direction::South, card("2D"), now);
        hand.card_found(Direction::West, card("2C"), now);
        hand.drain_effects();

        assert_eq!(
            hand.card_found(Direction::North, card("KS"), now),
            Admission::AwaitingConfirmation
        );
        assert_eq!(
            hand.card_found(Direction::North, card("KS"), now),
            Admission::AwaitingConfirmation
        );
        assert_eq!(
            events(&hand.drain_effects()),
            vec![GameEvent::CardIdentified(card("KS"))]
        );
        assert_eq!(hand.current_trick().len(), 3);
        assert_eq!(hand.pending_blind_card(), Some(card("KS")));

        assert_eq!(hand.play_blind_card(), Admission::Played);
        assert_eq!(hand.pending_blind_card(), None);
        assert_eq!(hand.current_trick().winner, Some(Direction::North));
        assert_eq!(hand.play_blind_card(), Admission::Ignored(IgnoreReason::NotReady));
    }

    #[test]
    fn test_undo_blind_card_reopens_dealing() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        assert_eq!(hand.undo_blind_card(), Some(card("AS")));
        assert_eq!(hand.state(), GameState::Dealing);
        assert_eq!(switches(&hand.drain_effects()), vec![Direction::North]);
        assert_eq!(hand.card_found(Direction::North, card("AS"), now), Admission::Scanned);
        assert_eq!(hand.state(), GameState::FirstCard);
    }

    #[test]
    fn test_undo_dummy_card_cancels_settle() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        hand.card_found(Direction::East, card("2H"), now);
        scan_suit(&mut hand, Direction::South, now);
        assert!(hand.settle_deadline().is_some());
        assert_eq!(hand.undo_dummy_card(), Some(card("AD")));
        assert_eq!(hand.settle_deadline(), None);
        assert_eq!(hand.player(Direction::South).hand.len(), 12);
        assert_eq!(hand.undo_blind_card(), None);
    }

    #[test]
    fn test_reverse_bid_position() {
        let now = Instant::now();
        let mut hand = ready_for_lead(HandRules::default(), now);
        assert!(hand.reverse_bid_position());
        assert_eq!(hand.state(), GameState::Dealing);
        assert!(hand.player(Direction::North).hand.is_empty());
        assert_eq!(hand.dummy(), None);
        assert!(!hand.player(Direction::South).is_dummy);
        assert_eq!(switches(&hand.drain_effects()), vec![Direction::North]);

        let mut playing = in_play(no_settle(), now);
        assert!(!playing.reverse_bid_position());
        assert!(!playing.set_declarer(Direction::East));
    }
}
