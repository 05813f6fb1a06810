use crate::cli::{Command, EnvCommand, IdentifierArgs};
use anyhow::{bail, Context};
use wallet_sdk::{
    health_status, DepositRequest, EarnRequest, NormalizedResponse, WalletClient, WithdrawRequest,
};

/// What a command produced, for [`crate::output::render`].
#[derive(Debug)]
pub(crate) enum Outcome {
    Response {
        label: &'static str,
        response: NormalizedResponse,
        /// Status line shown on success.
        note: Option<String>,
    },
    Message(String),
}

impl Outcome {
    fn response(label: &'static str, response: NormalizedResponse) -> Self {
        Self::Response {
            label,
            response,
            note: None,
        }
    }
}

fn identifier(client: &WalletClient, args: IdentifierArgs) -> anyhow::Result<String> {
    match args.mobile.or_else(|| client.session().current_identifier()) {
        Some(mobile) if !mobile.trim().is_empty() => Ok(mobile),
        _ => bail!("enter a mobile number (or log in once to remember it)"),
    }
}

pub(crate) async fn run(client: &WalletClient, command: Command) -> anyhow::Result<Outcome> {
    match command {
        Command::Env(env) => handle_env(client, env),
        Command::Health => {
            let response = client.health().await;
            let note = Some(format!("health: {}", health_status(&response)));
            Ok(Outcome::Response {
                label: "health",
                response,
                note,
            })
        }
        Command::Login { mobile } => {
            let response = client.login(&mobile).await?;
            let issued = response.ok
                && response
                    .payload
                    .field("token")
                    .and_then(|token| token.as_str())
                    .is_some();
            let note = issued.then(|| "token set".to_string());
            Ok(Outcome::Response {
                label: "login",
                response,
                note,
            })
        }
        Command::Logout => {
            client.session().logout()?;
            Ok(Outcome::Message("token cleared".to_string()))
        }
        Command::Whoami => {
            let session = client.session();
            let mobile = session
                .current_identifier()
                .unwrap_or_else(|| "<none>".to_string());
            let token = if session.has_token() {
                "token set"
            } else {
                "no token"
            };
            Ok(Outcome::Message(format!("{mobile} ({token})")))
        }
        Command::Balance(args) => {
            let mobile = identifier(client, args)?;
            Ok(Outcome::response("balance", client.balance(&mobile).await))
        }
        Command::Transactions(args) => {
            let mobile = identifier(client, args)?;
            Ok(Outcome::response(
                "transactions",
                client.transactions(&mobile).await,
            ))
        }
        Command::Earnings(args) => {
            let mobile = identifier(client, args)?;
            Ok(Outcome::response("earnings", client.earnings(&mobile).await))
        }
        Command::Deposit { amount, identifier: args } => {
            let request = DepositRequest {
                identifier: identifier(client, args)?,
                amount,
            };
            Ok(Outcome::response("deposit", client.deposit(&request).await))
        }
        Command::Withdraw {
            amount,
            provider,
            identifier: args,
        } => {
            let request = WithdrawRequest {
                identifier: identifier(client, args)?,
                amount,
                provider,
            };
            Ok(Outcome::response("withdraw", client.withdraw(&request).await))
        }
        Command::Earn {
            content_id,
            content_type,
            duration,
            identifier: args,
        } => {
            let request = EarnRequest {
                identifier: identifier(client, args)?,
                content_id: content_id.trim().to_string(),
                content_type,
                duration,
            };
            Ok(Outcome::response("earn", client.earn(&request).await))
        }
    }
}

fn handle_env(client: &WalletClient, command: EnvCommand) -> anyhow::Result<Outcome> {
    let environment = client.environment();
    match command {
        EnvCommand::Show => {}
        EnvCommand::Set { mode } => environment.set_mode(mode.into())?,
        EnvCommand::Custom { url } => environment
            .set_custom_url(&url)
            .context("use a full URL including http:// or https://")?,
    }
    Ok(Outcome::Message(format!(
        "ENV={} BASE={}",
        environment.mode(),
        environment.resolve_base_url()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, ModeArg};
    use clap::Parser;
    use std::sync::Arc;
    use wallet_sdk::{
        wallet_sdk_test::{MockResult, MockTransport},
        WalletClientOptions,
    };

    fn client() -> (WalletClient, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let client = WalletClient::new(WalletClientOptions {
            transport: Some(transport.clone()),
            ..Default::default()
        });
        (client, transport)
    }

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("wallet").chain(args.iter().copied()))
            .expect("arguments should parse")
            .command
    }

    #[tokio::test]
    async fn env_custom_rejects_bad_url_and_keeps_mode() {
        let (client, _) = client();
        run(&client, parse(&["env", "set", "local"])).await.unwrap();

        let error = run(&client, parse(&["env", "custom", "example.com"]))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("http://"));

        match run(&client, parse(&["env", "show"])).await.unwrap() {
            Outcome::Message(text) => assert_eq!(text, "ENV=local BASE=http://127.0.0.1:5000"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn balance_defaults_to_remembered_mobile() {
        let (client, transport) = client();
        client.session().set_identifier("9999999999").unwrap();
        transport.enqueue(MockResult::response(200, r#"{"balance": 12}"#));

        let outcome = run(&client, parse(&["balance"])).await.unwrap();

        assert!(matches!(outcome, Outcome::Response { label: "balance", ref response, .. } if response.ok));
        assert!(transport.tracked_requests()[0]
            .url
            .ends_with("/balance/9999999999"));
    }

    #[tokio::test]
    async fn wallet_commands_need_a_mobile() {
        let (client, transport) = client();
        let error = run(&client, parse(&["deposit", "10"])).await.unwrap_err();
        assert!(error.to_string().contains("mobile"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn login_notes_stored_token_and_logout_clears_it() {
        let (client, transport) = client();
        transport.enqueue(MockResult::response(200, r#"{"token": "tok-abc"}"#));

        match run(&client, parse(&["login", "9999999999"])).await.unwrap() {
            Outcome::Response { note, .. } => assert_eq!(note.as_deref(), Some("token set")),
            other => panic!("unexpected outcome: {other:?}"),
        }

        run(&client, parse(&["logout"])).await.unwrap();
        match run(&client, parse(&["whoami"])).await.unwrap() {
            Outcome::Message(text) => assert_eq!(text, "9999999999 (no token)"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_without_new_token_does_not_report_token_set() {
        let (client, transport) = client();
        client.session().login("9999999999", "tok-old").unwrap();
        transport.enqueue(MockResult::response(200, r#"{"message": "otp sent"}"#));

        match run(&client, parse(&["login", "9999999999"])).await.unwrap() {
            Outcome::Response { note, .. } => assert_eq!(note, None),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn parses_positional_arguments() {
        match parse(&["earn", "vid-1", "video", "30", "8888888888"]) {
            Command::Earn {
                content_id,
                content_type,
                duration,
                identifier,
            } => {
                assert_eq!(content_id, "vid-1");
                assert_eq!(content_type, "video");
                assert_eq!(duration, 30);
                assert_eq!(identifier.mobile.as_deref(), Some("8888888888"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(matches!(
            parse(&["env", "set", "custom"]),
            Command::Env(EnvCommand::Set {
                mode: ModeArg::Custom
            })
        ));
    }
}
