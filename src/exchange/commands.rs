// Command handler for the exchange CLI

use crate::exchange::*;
use anyhow::{Context, Result};
use std::io::Write;

/// Hint printed after a login invocation
pub const LOGIN_HINT: &str =
    "Done authenticate. You have to add flag '--action refresh' when the token expired";

/// Execute the parsed command line, writing results to stdout
pub async fn execute_command(cli: CatswordsCli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out).await
}

/// Execute the parsed command line, writing results to `out`
pub async fn run<W: Write>(cli: CatswordsCli, out: &mut W) -> Result<()> {
    if cli.action == Action::Hash {
        return handle_hash(&cli.inputs, out);
    }

    let config = cli.client_config();
    let http = config.http_client()?;
    let authenticator = Authenticator::with_client(http.clone(), config.clone());
    let mut session = Session::new(FileTokenStore::new(cli.token_file.clone()), authenticator);

    let credential = cli.credential();
    let force_refresh = cli.action == Action::Refresh;

    let (token, origin) = session
        .acquire(cli.explicit_token(), credential.as_ref(), force_refresh)
        .await
        .context("Could not obtain an access token")?;

    if origin == TokenOrigin::Issued {
        writeln!(out, "{}", token)?;
    }

    // Supplying credentials makes this a login run
    if credential.is_some() || cli.action == Action::Refresh {
        writeln!(out, "{}", LOGIN_HINT)?;
        return Ok(());
    }

    let client = ExchangeClient::with_client(http, config);

    match cli.action {
        Action::Send => handle_send(&client, &cli.inputs, &token, out).await,
        Action::Receive => handle_receive(&client, &cli.inputs, cli.limit, &token, out).await,
        Action::Refresh | Action::Hash => Ok(()),
    }
}

fn handle_hash<W: Write>(inputs: &RawInputs, out: &mut W) -> Result<()> {
    let payload = inputs
        .payload()?
        .unwrap_or_else(|| Payload::from_bytes(Vec::new()));

    let name = inputs.hash_function.as_deref().unwrap_or_default();
    let result = digest::digest_named(&payload.bytes, name)?;

    writeln!(out, "{}", serde_json::to_string(&result)?)?;
    Ok(())
}

async fn handle_send<W: Write>(
    client: &ExchangeClient,
    inputs: &RawInputs,
    token: &Token,
    out: &mut W,
) -> Result<()> {
    let payload = inputs.payload()?.ok_or(ExchangeError::MissingMessage)?;
    let context = context::build(inputs, payload, client.config());

    let response = client
        .send(&context, token)
        .await
        .context("Failed to send message")?;

    writeln!(out, "{}", response)?;
    Ok(())
}

async fn handle_receive<W: Write>(
    client: &ExchangeClient,
    inputs: &RawInputs,
    limit: u32,
    token: &Token,
    out: &mut W,
) -> Result<()> {
    let network_id = inputs.network_id().ok_or(ExchangeError::MissingNetworkId)?;
    let filter = NetworkFilter::new(network_id, limit)?;

    let response = client
        .receive(&filter, token)
        .await
        .context("Failed to receive messages")?;

    writeln!(out, "{}", response)?;
    Ok(())
}

/// Exit code for an error returned by [`execute_command`]
pub fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ExchangeError>())
        .map(ExchangeError::exit_code)
        .unwrap_or(1)
}
