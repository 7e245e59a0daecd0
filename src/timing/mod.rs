//! Timing domain: cancellable delayed-action decks.

mod deck;

#[cfg(test)]
mod tests;

pub use deck::{TimerDeck, TimerHandle};
