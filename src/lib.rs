//! catswords - Command-line client for the Catswords message exchange
//!
//! This library authenticates against the exchange, keeps the issued bearer
//! token on disk, builds message envelopes from command-line fields, posts
//! and fetches them, and hashes message content locally.

pub mod exchange;

pub use exchange::{
    execute_command, CatswordsCli, ClientConfig, ExchangeClient, ExchangeError, MessageContext,
};
