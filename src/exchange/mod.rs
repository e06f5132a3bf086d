// Exchange client module
//
// Talks to the Catswords message exchange: obtains and stores a bearer
// token, publishes message envelopes, fetches messages by network ID and
// computes content digests locally.

pub mod error;
pub mod config;
pub mod digest;
pub mod token;
pub mod auth;
pub mod context;
pub mod client;
pub mod session;
pub mod cli;
pub mod commands;

pub use error::{ExchangeError, ExchangeResult};
pub use config::ClientConfig;
pub use digest::{HashAlgorithm, HashResult};
pub use token::{FileTokenStore, MemoryTokenStore, Token, TokenStore};
pub use auth::{Authenticator, Credential};
pub use context::{MessageContext, MessageStatus, Payload, RawInputs};
pub use client::{ExchangeClient, NetworkFilter};
pub use session::{Session, TokenOrigin, TokenState};
pub use cli::{Action, CatswordsCli};
pub use commands::{execute_command, exit_code};
