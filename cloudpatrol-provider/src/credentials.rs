//! Role assumption: exchanging the base session for temporary credentials.
//!
//! The exchange runs synchronously and exactly once per audit run, before any
//! regional client is built. There is no refresh-in-place: expired credentials
//! mean a new audit run and a fresh exchange.

use std::io::{BufRead, Write};
use std::time::SystemTime;

use aws_config::SdkConfig;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::DateTime;
use thiserror::Error;

/// Fixed role session name identifying this tool in CloudTrail and in the
/// assumed-role ARN.
pub const ASSESSMENT_SESSION_NAME: &str = "CloudPatrolAssessmentSession";

/// Platform minimum for assumed-role sessions.
pub const DEFAULT_SESSION_DURATION_SECONDS: i32 = 900;

/// The audit session could not be established. Fatal: the run cannot proceed,
/// and the exchange is never retried automatically.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The token service rejected the exchange: unknown role or denied trust,
    /// external ID mismatch, invalid or expired MFA code, or a disallowed
    /// session duration.
    #[error("sts:AssumeRole rejected for {role_arn}: {message}")]
    AssumeRoleRejected { role_arn: String, message: String },

    /// The caller identity could not be resolved.
    #[error("sts:GetCallerIdentity failed: {0}")]
    IdentityLookup(String),

    /// The token service answered without a field this core depends on.
    #[error("token service response missing {0}")]
    IncompleteResponse(&'static str),

    /// The interactive MFA collaborator failed to produce a token.
    #[error("MFA prompt failed: {0}")]
    MfaPrompt(String),
}

/// Descriptor of the role to assume, from the operator's configuration.
#[derive(Debug, Clone)]
pub struct AssumedRoleInfo {
    pub role_arn: String,
    /// Requested credential lifetime; bounds are enforced by the token
    /// service and a rejected duration surfaces as [`AuthenticationError`].
    pub session_duration_seconds: i32,
    pub external_id: Option<String>,
    /// Whether the role's trust policy demands an MFA challenge.
    pub mfa_enabled: bool,
}

impl AssumedRoleInfo {
    pub fn new(role_arn: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            session_duration_seconds: DEFAULT_SESSION_DURATION_SECONDS,
            external_id: None,
            mfa_enabled: false,
        }
    }
}

/// Temporary credential set the audit runs under.
///
/// Created once per run by [`assume_role`], then shared read-only. The ARN and
/// unique id are taken verbatim from the token service; downstream identity
/// derivation depends on their exact shapes
/// (`arn:<partition>:sts::<account>:assumed-role/<role>/<session>` and
/// `<role-unique-prefix>:<session>`).
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime,
    pub assumed_role_arn: String,
    pub assumed_role_unique_id: String,
}

/// An MFA device serial and the code it currently shows.
#[derive(Debug, Clone)]
pub struct MfaToken {
    pub serial_number: String,
    pub token_code: String,
}

/// Interactive collaborator that obtains an MFA token from the operator.
///
/// Injected so non-interactive environments can substitute a deterministic
/// double. The call blocks until the operator answers.
pub trait MfaTokenPrompt {
    fn prompt(&self, role_info: &AssumedRoleInfo) -> Result<MfaToken, AuthenticationError>;
}

/// Prompts the operator on stdin/stderr.
///
/// Malformed input (a serial that is not an MFA device ARN, a code that is not
/// six digits) re-prompts locally; nothing reaches the network until the pair
/// is syntactically valid.
pub struct TerminalMfaPrompt;

impl MfaTokenPrompt for TerminalMfaPrompt {
    fn prompt(&self, role_info: &AssumedRoleInfo) -> Result<MfaToken, AuthenticationError> {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stderr();

        let serial_number = loop {
            let line = ask(
                &mut input,
                &mut output,
                &format!("MFA device ARN for {}: ", role_info.role_arn),
            )?;
            if is_mfa_serial(&line) {
                break line;
            }
            log::warn!("not an MFA device ARN: {line}");
        };

        let token_code = loop {
            let line = ask(&mut input, &mut output, "MFA code: ")?;
            if is_mfa_code(&line) {
                break line;
            }
            log::warn!("MFA codes are six digits");
        };

        Ok(MfaToken {
            serial_number,
            token_code,
        })
    }
}

fn ask(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
) -> Result<String, AuthenticationError> {
    output
        .write_all(question.as_bytes())
        .and_then(|()| output.flush())
        .map_err(|e| AuthenticationError::MfaPrompt(e.to_string()))?;

    let mut line = String::new();
    let bytes = input
        .read_line(&mut line)
        .map_err(|e| AuthenticationError::MfaPrompt(e.to_string()))?;
    if bytes == 0 {
        return Err(AuthenticationError::MfaPrompt(
            "end of input while waiting for the operator".to_string(),
        ));
    }
    Ok(line.trim().to_string())
}

fn is_mfa_serial(serial: &str) -> bool {
    serial.starts_with("arn:") && serial.contains(":mfa/")
}

fn is_mfa_code(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Exchange `base_session` for temporary credentials for `role_info`.
///
/// When the role demands MFA, `mfa_prompt` runs exactly once before the
/// exchange is issued; its device ARN and code are sent as the serial number
/// and token code.
pub async fn assume_role(
    base_session: &SdkConfig,
    role_info: &AssumedRoleInfo,
    mfa_prompt: &dyn MfaTokenPrompt,
) -> Result<ResolvedCredentials, AuthenticationError> {
    let client = aws_sdk_sts::Client::new(base_session);

    let mut request = client
        .assume_role()
        .role_arn(&role_info.role_arn)
        .role_session_name(ASSESSMENT_SESSION_NAME)
        .duration_seconds(role_info.session_duration_seconds);

    if let Some(external_id) = &role_info.external_id {
        request = request.external_id(external_id);
    }

    if role_info.mfa_enabled {
        let token = mfa_prompt.prompt(role_info)?;
        request = request
            .serial_number(token.serial_number)
            .token_code(token.token_code);
    }

    log::debug!(
        "assuming role {} for {}s as {ASSESSMENT_SESSION_NAME}",
        role_info.role_arn,
        role_info.session_duration_seconds
    );

    let response =
        request
            .send()
            .await
            .map_err(|err| AuthenticationError::AssumeRoleRejected {
                role_arn: role_info.role_arn.clone(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

    let credentials = response
        .credentials()
        .ok_or(AuthenticationError::IncompleteResponse("credentials"))?;
    let assumed_role_user = response
        .assumed_role_user()
        .ok_or(AuthenticationError::IncompleteResponse("assumed role user"))?;

    Ok(ResolvedCredentials {
        access_key_id: credentials.access_key_id().to_string(),
        secret_access_key: credentials.secret_access_key().to_string(),
        session_token: credentials.session_token().to_string(),
        expiration: *credentials.expiration(),
        assumed_role_arn: assumed_role_user.arn().to_string(),
        assumed_role_unique_id: assumed_role_user.assumed_role_id().to_string(),
    })
}

/// Build the audit session from assumed-role credentials.
///
/// Everything else (region, endpoint conventions, HTTP and retry plumbing) is
/// inherited from the base session; only the credential source changes. The
/// credentials are attached as a static provider with their expiry; the
/// session never refreshes them.
pub fn session_from_credentials(
    base_session: &SdkConfig,
    credentials: &ResolvedCredentials,
) -> SdkConfig {
    let expiry = SystemTime::try_from(credentials.expiration).ok();
    let provider = Credentials::new(
        credentials.access_key_id.clone(),
        credentials.secret_access_key.clone(),
        Some(credentials.session_token.clone()),
        expiry,
        "cloudpatrol-assume-role",
    );

    base_session
        .to_builder()
        .credentials_provider(SharedCredentialsProvider::new(provider))
        .build()
}
