//! Unit tests for secret loading.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::rstest;

use super::*;

fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn release_vars() -> Vec<(&'static str, &'static str)> {
    vec![
        (TOKEN_SECRET_ENV, "0123456789abcdef0123456789abcdef"),
        (GATEWAY_KEY_SECRET_ENV, "key_secret"),
        (GATEWAY_WEBHOOK_SECRET_ENV, "whsec"),
    ]
}

fn expect_error(result: Result<Secrets, SecretsError>) -> SecretsError {
    match result {
        Ok(_) => panic!("expected secrets to be rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_accepts_complete_secrets() {
    let env = mock_env(&release_vars());
    let secrets = secrets_from_env(&env, BuildMode::Release, false).expect("secrets");
    assert_eq!(secrets.token_secret.as_slice(), b"0123456789abcdef0123456789abcdef");
    assert_eq!(secrets.gateway_key_secret.as_str(), "key_secret");
    assert!(secrets.mail_api_key.is_none());
}

#[rstest]
#[case(TOKEN_SECRET_ENV)]
#[case(GATEWAY_KEY_SECRET_ENV)]
#[case(GATEWAY_WEBHOOK_SECRET_ENV)]
fn release_requires_every_secret(#[case] missing: &'static str) {
    let vars: Vec<_> = release_vars()
        .into_iter()
        .filter(|(name, _)| *name != missing)
        .collect();
    let err = expect_error(secrets_from_env(&mock_env(&vars), BuildMode::Release, false));
    assert_eq!(err, SecretsError::MissingEnv { name: missing });
}

#[rstest]
fn release_rejects_short_token_secrets() {
    let mut vars = release_vars();
    vars[0] = (TOKEN_SECRET_ENV, "short");
    let err = expect_error(secrets_from_env(&mock_env(&vars), BuildMode::Release, false));
    assert_eq!(
        err,
        SecretsError::TokenSecretTooShort {
            length: 5,
            min_len: TOKEN_SECRET_MIN_LEN
        }
    );
}

#[rstest]
fn release_rejects_ephemeral_secrets() {
    let mut vars = release_vars();
    vars.push((ALLOW_EPHEMERAL_ENV, "1"));
    let err = expect_error(secrets_from_env(&mock_env(&vars), BuildMode::Release, false));
    assert_eq!(err, SecretsError::EphemeralNotAllowed);
}

#[rstest]
fn debug_generates_a_temporary_token_secret() {
    let secrets = secrets_from_env(&mock_env(&[]), BuildMode::Debug, false).expect("secrets");
    assert_eq!(secrets.token_secret.len(), TOKEN_SECRET_MIN_LEN);
    assert!(secrets.gateway_webhook_secret.is_empty());
}

#[rstest]
fn relays_need_a_mail_key() {
    let err = expect_error(secrets_from_env(
        &mock_env(&release_vars()),
        BuildMode::Release,
        true,
    ));
    assert_eq!(
        err,
        SecretsError::MissingEnv {
            name: MAIL_API_KEY_ENV
        }
    );

    let mut vars = release_vars();
    vars.push((MAIL_API_KEY_ENV, "relay-key"));
    let secrets = secrets_from_env(&mock_env(&vars), BuildMode::Release, true).expect("secrets");
    assert_eq!(
        secrets.mail_api_key.as_deref().map(String::as_str),
        Some("relay-key")
    );
}

#[rstest]
#[case("maybe", BuildMode::Release, true)]
#[case("maybe", BuildMode::Debug, false)]
fn invalid_ephemeral_flags(#[case] value: &str, #[case] mode: BuildMode, #[case] fails: bool) {
    let mut vars = release_vars();
    vars.push((ALLOW_EPHEMERAL_ENV, value));
    assert_eq!(secrets_from_env(&mock_env(&vars), mode, false).is_err(), fails);
}
