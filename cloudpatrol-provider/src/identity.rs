//! Caller identity resolution.
//!
//! Runs after role assumption so the resolved identity reflects the session
//! the audit actually uses.

use aws_smithy_types::error::display::DisplayErrorContext;

use crate::context::AuditContext;
use crate::credentials::AuthenticationError;

/// Resolve who the audit session is, populating `account`, `account_arn`,
/// `identity_arn`, and `user_id` on the context.
pub async fn resolve_caller_identity(
    context: &mut AuditContext,
) -> Result<(), AuthenticationError> {
    let client = aws_sdk_sts::Client::new(context.audit_session());
    let response = client
        .get_caller_identity()
        .send()
        .await
        .map_err(|err| AuthenticationError::IdentityLookup(DisplayErrorContext(&err).to_string()))?;

    let account = response
        .account()
        .ok_or(AuthenticationError::IncompleteResponse("account id"))?;
    let identity_arn = response
        .arn()
        .ok_or(AuthenticationError::IncompleteResponse("identity ARN"))?;
    let user_id = response
        .user_id()
        .ok_or(AuthenticationError::IncompleteResponse("user id"))?;

    let account_arn = format!("arn:{}:iam::{account}:root", context.partition());
    log::debug!("auditing account {account} as {identity_arn}");

    context.set_identity(
        account.to_string(),
        account_arn,
        identity_arn.to_string(),
        user_id.to_string(),
    );
    Ok(())
}
