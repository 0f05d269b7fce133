//! Betting ledger: balance, stake placement, payout projection, settlement

use thiserror::Error;
use tracing::{info, warn};

use crate::core::round_to_hundredths;
use crate::models::horse::Horse;
use crate::models::roster::LaneRoster;

/// Balance every session starts with unless configured otherwise
pub const STARTING_BALANCE: f64 = 100.0;

/// Constant term of the payout multiplier
pub const PAYOUT_BASE: f64 = 1.1;

/// Errors that can occur during ledger operations
#[derive(Debug, Error, PartialEq, Clone)]
pub enum LedgerError {
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("Invalid bet amount: {0}")]
    InvalidAmount(f64),

    #[error("Unknown horse: {0}")]
    UnknownHorse(String),

    #[error("A bet of {0} is already open for this race")]
    BetAlreadyOpen(f64),

    #[error("No bet has been placed for this race")]
    NoOpenBet,
}

/// Potential winnings of one horse for the current stake
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedPayout {
    pub lane: usize,
    pub name: String,
    pub payout: f64,
}

/// Result of settling an open bet
#[derive(Debug, Clone, PartialEq)]
pub struct BetSettlement {
    /// Backed horse, if one was selected
    pub horse: Option<String>,
    pub stake: f64,
    pub won: bool,
    /// Amount credited (0.0 on a loss)
    pub payout: f64,
    pub balance_after: f64,
}

/// `(confidence + win_rate + 1.1) * stake`, rounded to 2 decimals
///
/// # Example
/// ```
/// use horse_race_core::{projected_payout, Horse};
///
/// let horse = Horse::new("Mystic sun", 'M', 0.5);
/// assert_eq!(projected_payout(&horse, 10.0), 16.0);
/// ```
pub fn projected_payout(horse: &Horse, stake: f64) -> f64 {
    round_to_hundredths((horse.confidence() + horse.win_rate() + PAYOUT_BASE) * stake)
}

/// Session-wide betting account
///
/// # Example
/// ```
/// use horse_race_core::{BettingLedger, Horse, LaneRoster};
///
/// let mut roster = LaneRoster::new(2).unwrap();
/// roster.add_horse(Horse::new("Brave fire", 'B', 0.5), 1).unwrap();
/// roster.add_horse(Horse::new("Red dream", 'R', 0.3), 2).unwrap();
///
/// let mut ledger = BettingLedger::new(100.0);
/// ledger.place_bet(10.0, &mut roster).unwrap();
/// assert_eq!(ledger.balance(), 90.0);
///
/// ledger.select_horse("Brave fire", &mut roster).unwrap();
/// let settlement = ledger.settle(Some("Brave fire"), &mut roster).unwrap();
/// assert!(settlement.won);
/// assert_eq!(ledger.balance(), 106.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BettingLedger {
    balance: f64,
    /// Stake committed for the upcoming race
    stake: Option<f64>,
}

impl Default for BettingLedger {
    fn default() -> Self {
        Self::new(STARTING_BALANCE)
    }
}

impl BettingLedger {
    pub fn new(starting_balance: f64) -> Self {
        Self {
            balance: starting_balance,
            stake: None,
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Stake committed for the upcoming race, if any
    pub fn stake(&self) -> Option<f64> {
        self.stake
    }

    /// Name of the backed horse, if one has been selected
    pub fn backed_horse<'a>(&self, roster: &'a LaneRoster) -> Option<&'a Horse> {
        roster.horses().find(|horse| horse.is_bet_placed())
    }

    /// Commit `amount` to the upcoming race
    ///
    /// The stake is deducted immediately. Every horse in the roster gets its
    /// projected payout stored as pending winnings.
    pub fn place_bet(&mut self, amount: f64, roster: &mut LaneRoster) -> Result<f64, LedgerError> {
        if !amount.is_finite() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if let Some(open) = self.stake {
            return Err(LedgerError::BetAlreadyOpen(open));
        }
        if amount <= 0.0 || amount > self.balance {
            warn!(requested = amount, available = self.balance, "bet rejected");
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        self.stake = Some(amount);
        for horse in roster.horses_mut() {
            let payout = projected_payout(horse, amount);
            horse.set_pending_winnings(payout);
        }

        info!(stake = amount, balance = self.balance, "bet placed");
        Ok(self.balance)
    }

    /// Payout each horse would return for the open stake, in lane order
    pub fn projected_payouts(&self, roster: &LaneRoster) -> Result<Vec<ProjectedPayout>, LedgerError> {
        let stake = self.stake.ok_or(LedgerError::NoOpenBet)?;
        Ok(roster
            .horses()
            .map(|horse| ProjectedPayout {
                lane: horse.lane(),
                name: horse.name().to_string(),
                payout: projected_payout(horse, stake),
            })
            .collect())
    }

    /// Back `name` with the open stake
    ///
    /// Exactly one horse carries the bet flag afterwards. Its pending
    /// winnings are re-quoted from its current confidence and win rate.
    pub fn select_horse(&mut self, name: &str, roster: &mut LaneRoster) -> Result<f64, LedgerError> {
        let stake = self.stake.ok_or(LedgerError::NoOpenBet)?;
        if !roster.contains_name(name) {
            return Err(LedgerError::UnknownHorse(name.to_string()));
        }

        let mut payout = 0.0;
        for horse in roster.horses_mut() {
            let backed = horse.name() == name;
            horse.set_bet_placed(backed);
            if backed {
                payout = projected_payout(horse, stake);
                horse.set_pending_winnings(payout);
            }
        }

        info!(horse = name, projected_payout = payout, "horse backed");
        Ok(payout)
    }

    /// Settle the open bet against `winner` (`None` when nobody won)
    ///
    /// Pays the backed horse's pending winnings if it won. Bet state is
    /// cleared on every horse regardless of outcome. Returns `None` when no
    /// bet was open.
    pub fn settle(&mut self, winner: Option<&str>, roster: &mut LaneRoster) -> Option<BetSettlement> {
        let settlement = self.stake.take().map(|stake| {
            let backed = self.backed_horse(roster);
            let horse = backed.map(|h| h.name().to_string());
            let won = matches!((backed, winner), (Some(h), Some(w)) if h.name() == w);
            let payout = match backed {
                Some(h) if won => h.pending_winnings(),
                _ => 0.0,
            };

            self.balance += payout;
            info!(
                horse = horse.as_deref().unwrap_or("<none>"),
                won,
                payout,
                balance = self.balance,
                "bet settled"
            );

            BetSettlement {
                horse,
                stake,
                won,
                payout,
                balance_after: self.balance,
            }
        });

        for horse in roster.horses_mut() {
            horse.clear_bet();
        }

        settlement
    }

    /// Restore a balance from a checkpoint
    pub(crate) fn restore_balance(&mut self, balance: f64) {
        self.balance = balance;
        self.stake = None;
    }
}
