// Token lifecycle
//
// Tracks whether this invocation holds a usable bearer token:
//
//   NoToken -> Authenticating -> Authenticated
//                   |                  |
//                   v                  | (refresh requested)
//               AuthFailed             v
//                                Authenticating
//
// A token that was supplied explicitly or found in the store is used as is.
// Authentication happens only when there is none or a refresh is forced.
// The store is written only after it succeeds; if authentication or the
// write fails the session ends in AuthFailed.

use crate::exchange::auth::{Authenticator, Credential};
use crate::exchange::error::{ExchangeError, ExchangeResult};
use crate::exchange::token::{Token, TokenStore};
use tracing::{debug, info, warn};

/// Where the session stands with respect to its bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    Authenticating,
    Authenticated(Token),
    AuthFailed,
}

/// How the current token was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOrigin {
    /// Passed in by the caller
    Explicit,
    /// Read from the token store
    Stored,
    /// Issued by the backend during this session
    Issued,
}

/// Owns the token store and decides when to re-authenticate
pub struct Session<S: TokenStore> {
    store: S,
    authenticator: Authenticator,
    state: TokenState,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S, authenticator: Authenticator) -> Self {
        Self {
            store,
            authenticator,
            state: TokenState::NoToken,
        }
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current token, if authenticated
    pub fn token(&self) -> Option<&Token> {
        match &self.state {
            TokenState::Authenticated(token) => Some(token),
            _ => None,
        }
    }

    /// Obtain a token for this invocation.
    ///
    /// `explicit` takes precedence over the store. With `force_refresh` or
    /// when no token is available, `credential` is exchanged for a new one;
    /// without a credential that is a [`ExchangeError::MissingToken`].
    pub async fn acquire(
        &mut self,
        explicit: Option<Token>,
        credential: Option<&Credential>,
        force_refresh: bool,
    ) -> ExchangeResult<(Token, TokenOrigin)> {
        if !force_refresh {
            if let Some(token) = explicit {
                debug!("Using explicitly supplied token");
                self.state = TokenState::Authenticated(token.clone());
                return Ok((token, TokenOrigin::Explicit));
            }

            if let Some(token) = self.store.load()? {
                debug!("Using stored token");
                self.state = TokenState::Authenticated(token.clone());
                return Ok((token, TokenOrigin::Stored));
            }
        }

        let Some(credential) = credential else {
            self.state = TokenState::NoToken;
            return Err(ExchangeError::MissingToken);
        };

        let token = self.refresh(credential).await?;
        Ok((token, TokenOrigin::Issued))
    }

    /// Authenticate unconditionally and persist the new token
    pub async fn refresh(&mut self, credential: &Credential) -> ExchangeResult<Token> {
        info!("Requesting a new token");
        self.state = TokenState::Authenticating;

        let token = match self.authenticator.authenticate(credential).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Authentication failed, keeping stored token untouched");
                self.state = TokenState::AuthFailed;
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&token) {
            warn!("Could not store the new token");
            self.state = TokenState::AuthFailed;
            return Err(e);
        }
        self.state = TokenState::Authenticated(token.clone());
        Ok(token)
    }
}
