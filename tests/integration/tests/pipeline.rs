//! Full pipeline scenarios against the stub provider.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use rp_oidc::{
    AuthenticatedIdentity, AuthenticationFailure, AuthorizationResponse, FlowResult, FlowState,
    FlowStateStore, IdentityClaims, IdentityMapper, TokenResponse,
};
use serde_json::json;

use crate::common;

fn response() -> AuthorizationResponse {
    AuthorizationResponse::new("code-1", "session-1").with_state("abc123")
}

#[tokio::test]
async fn successful_flow_produces_identity() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY1_PRIVATE_PEM,
        &common::standard_claims("n-1"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    let identity = outcome.identity().expect("success");
    assert_eq!(identity.subject, "user-1");
    assert_eq!(identity.username.as_deref(), Some("jdoe"));
    assert_eq!(identity.provider, "idp");

    assert_eq!(stub.hits(), 1);
    let recorded = stub.requests();
    let form = &recorded[0].form;
    assert_eq!(form.get("grant_type").map(String::as_str), Some("authorization_code"));
    assert_eq!(form.get("code").map(String::as_str), Some("code-1"));
    assert_eq!(form.get("redirect_uri").map(String::as_str), Some(common::REDIRECT_URI));
    assert_eq!(form.get("client_id").map(String::as_str), Some(common::CLIENT_ID));
    Ok(())
}

#[tokio::test]
async fn state_mismatch_never_reaches_the_provider() -> anyhow::Result<()> {
    let stub = common::StubProvider::start(StatusCode::OK, json!({})).await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler
        .handle(AuthorizationResponse::new("code-1", "session-1").with_state("forged"))
        .await;

    assert_eq!(outcome.failure(), Some(&AuthenticationFailure::StateMismatch));
    assert_eq!(stub.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn provider_rejection_carries_the_error_code() -> anyhow::Result<()> {
    let stub = common::StubProvider::start(
        StatusCode::BAD_REQUEST,
        json!({"error": "invalid_grant", "error_description": "code expired"}),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    assert_eq!(
        outcome.failure(),
        Some(&AuthenticationFailure::TokenEndpointRejected {
            error: "invalid_grant".to_string(),
            description: Some("code expired".to_string()),
        })
    );
    Ok(())
}

#[tokio::test]
async fn unparseable_success_body_is_malformed() -> anyhow::Result<()> {
    let stub = common::StubProvider::start(StatusCode::OK, json!({"hello": true})).await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    assert!(matches!(
        outcome.failure(),
        Some(AuthenticationFailure::MalformedTokenResponse(_))
    ));
    Ok(())
}

#[tokio::test]
async fn missing_id_token_fails_cleanly() -> anyhow::Result<()> {
    let stub = common::StubProvider::start(
        StatusCode::OK,
        json!({"access_token": "at-123", "token_type": "Bearer"}),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    assert_eq!(
        outcome.failure(),
        Some(&AuthenticationFailure::NoIdentityTokenPresent)
    );
    Ok(())
}

#[tokio::test]
async fn token_signed_by_unknown_key_is_rejected() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY2_PRIVATE_PEM,
        &common::standard_claims("n-1"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    assert!(matches!(
        outcome.failure(),
        Some(AuthenticationFailure::SignatureInvalid(_))
    ));
    Ok(())
}

#[tokio::test]
async fn token_for_another_audience_is_rejected() -> anyhow::Result<()> {
    let mut claims = common::standard_claims("n-1");
    claims["aud"] = json!("someone-else");
    let id_token = common::mint_id_token(common::KEY1_PRIVATE_PEM, &claims);
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    assert_eq!(
        outcome.failure(),
        Some(&AuthenticationFailure::AudienceMismatch {
            expected: common::CLIENT_ID.to_string(),
        })
    );
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> anyhow::Result<()> {
    let mut claims = common::standard_claims("n-1");
    claims["exp"] = json!(chrono::Utc::now().timestamp() - 600);
    let id_token = common::mint_id_token(common::KEY1_PRIVATE_PEM, &claims);
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    assert_eq!(outcome.failure(), Some(&AuthenticationFailure::TokenExpired));
    Ok(())
}

#[tokio::test]
async fn token_with_foreign_nonce_is_rejected() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY1_PRIVATE_PEM,
        &common::standard_claims("n-other"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    let outcome = handler.handle(response()).await;

    assert_eq!(outcome.failure(), Some(&AuthenticationFailure::NonceMismatch));
    Ok(())
}

/// A mapper that only admits identities carrying a `department` claim.
struct DepartmentGate;

#[async_trait]
impl IdentityMapper for DepartmentGate {
    async fn map(
        &self,
        provider: &str,
        tokens: &TokenResponse,
        claims: &IdentityClaims,
    ) -> FlowResult<AuthenticatedIdentity> {
        let Some(department) = claims.string_claim("department") else {
            return Err(AuthenticationFailure::ClaimsRejected(
                "no department claim".to_string(),
            ));
        };
        Ok(AuthenticatedIdentity {
            provider: provider.to_string(),
            subject: claims.subject().to_string(),
            username: None,
            email: None,
            display_name: None,
            roles: vec![department.to_string()],
            attributes: claims.additional_claims().clone(),
            tokens: tokens.clone(),
        })
    }
}

#[tokio::test]
async fn custom_mapper_can_reject_validated_claims() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY1_PRIVATE_PEM,
        &common::standard_claims("n-1"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;
    let handler = handler.with_mapper(Arc::new(DepartmentGate));

    let outcome = handler.handle(response()).await;

    assert!(matches!(
        outcome.failure(),
        Some(AuthenticationFailure::ClaimsRejected(_))
    ));
    Ok(())
}

#[tokio::test]
async fn replayed_response_is_rejected_without_a_second_exchange() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY1_PRIVATE_PEM,
        &common::standard_claims("n-1"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, _store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;

    assert!(handler.handle(response()).await.is_success());
    let replay = handler.handle(response()).await;

    assert_eq!(replay.failure(), Some(&AuthenticationFailure::StateMissing));
    assert_eq!(stub.hits(), 1);
    Ok(())
}

#[tokio::test]
async fn pkce_verifier_is_forwarded_to_the_exchange() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY1_PRIVATE_PEM,
        &common::standard_claims("n-1"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let (handler, store) = common::seeded_handler(common::client_config(), &stub.token_url()).await;
    store
        .put(
            "session-1",
            FlowState::new()
                .with_state("abc123")
                .with_nonce("n-1")
                .with_pkce_verifier("verifier-xyz"),
        )
        .await;

    assert!(handler.handle(response()).await.is_success());

    let recorded = stub.requests();
    assert_eq!(
        recorded[0].form.get("code_verifier").map(String::as_str),
        Some("verifier-xyz")
    );
    Ok(())
}

#[tokio::test]
async fn confidential_client_authenticates_with_basic_auth() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY1_PRIVATE_PEM,
        &common::standard_claims("n-1"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let config = common::client_config().with_client_secret_basic("s3cr3t");
    let (handler, _store) = common::seeded_handler(config, &stub.token_url()).await;

    assert!(handler.handle(response()).await.is_success());

    let recorded = stub.requests();
    let authorization = recorded[0].authorization.as_deref().expect("basic auth header");
    assert!(authorization.starts_with("Basic "));
    // With basic auth the secret must not leak into the form body.
    assert!(recorded[0].form.get("client_secret").is_none());
    Ok(())
}

#[tokio::test]
async fn post_secret_goes_into_the_form_body() -> anyhow::Result<()> {
    let id_token = common::mint_id_token(
        common::KEY1_PRIVATE_PEM,
        &common::standard_claims("n-1"),
    );
    let stub = common::StubProvider::start(
        StatusCode::OK,
        common::token_response_body(&id_token),
    )
    .await?;
    let config = common::client_config().with_client_secret_post("s3cr3t");
    let (handler, _store) = common::seeded_handler(config, &stub.token_url()).await;

    assert!(handler.handle(response()).await.is_success());

    let recorded = stub.requests();
    assert_eq!(
        recorded[0].form.get("client_secret").map(String::as_str),
        Some("s3cr3t")
    );
    assert!(recorded[0].authorization.is_none());
    Ok(())
}
