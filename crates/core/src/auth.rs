use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// One email/password pair accepted by the placeholder login.
///
/// This is not a security boundary; the portal gates the screen flow, not
/// the data.
#[derive(Clone, Debug, Deserialize)]
pub struct Credential {
    pub email: String,
    pub password: SecretString,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into().into() }
    }
}

/// Credential verification as an injected capability, so the workflow never
/// embeds a comparison table of its own.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> bool;
}

/// Verifier backed by a fixed credential set.
///
/// Comparison is exact string equality: case-sensitive, whitespace-sensitive,
/// no normalization.
#[derive(Clone, Debug, Default)]
pub struct FixedCredentialVerifier {
    credentials: Vec<Credential>,
}

impl FixedCredentialVerifier {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }
}

impl CredentialVerifier for FixedCredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> bool {
        self.credentials.iter().any(|credential| {
            credential.email == email && credential.password.expose_secret() == password
        })
    }
}
