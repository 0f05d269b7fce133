//! Betting Module
//!
//! A single bettor with a session-wide balance wagers on one horse per race.
//!
//! # Bet Flow
//!
//! ```text
//! place_bet(stake)   -> stake deducted now, projected payout stored on every horse
//! select_horse(name) -> exactly one horse marked as backed
//! ... race runs ...
//! settle(winner)     -> backed horse won: balance += its pending winnings
//!                       all horses: bet flag and pending winnings cleared
//! ```
//!
//! # Critical Invariants
//!
//! 1. **Non-negative balance**: a stake can never exceed the balance
//! 2. **Commit on placement**: the stake leaves the balance before the race,
//!    so a losing bet needs no further debit
//! 3. **Clean slate**: after settlement no horse carries bet state
//!
//! The balance has a single writer and no internal locking; share it across
//! threads only behind external synchronization.

pub mod ledger;

pub use ledger::{
    projected_payout, BetSettlement, BettingLedger, LedgerError, ProjectedPayout, PAYOUT_BASE,
    STARTING_BALANCE,
};
