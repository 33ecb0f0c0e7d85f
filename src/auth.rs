//! Login gate
//!
//! Collects a username/password pair and hands it to a caller-supplied
//! verifier. The gate performs no checking of its own, and a rejection
//! message is surfaced exactly as the verifier wrote it.

use crate::models::Credentials;
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Err(message)` rejects the login; `message` is shown verbatim.
    async fn verify(&self, credentials: &Credentials) -> std::result::Result<(), String>;
}

/// Accepts exactly one configured username/password pair.
pub struct StaticCredentialVerifier {
    expected: Credentials,
}

impl StaticCredentialVerifier {
    pub fn new(expected: Credentials) -> Self {
        Self { expected }
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, credentials: &Credentials) -> std::result::Result<(), String> {
        if *credentials == self.expected {
            Ok(())
        } else {
            Err("Invalid username or password.".to_string())
        }
    }
}

pub struct LoginGate {
    verifier: Box<dyn CredentialVerifier>,
    latency: Duration,
}

impl LoginGate {
    pub fn new(verifier: Box<dyn CredentialVerifier>) -> Self {
        Self {
            verifier,
            latency: Duration::ZERO,
        }
    }

    /// Wait this long before forwarding, mimicking a network round trip.
    pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Forward the pair, unvalidated, to the verifier.
    pub async fn submit(&self, username: &str, password: &str) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        match self.verifier.verify(&credentials).await {
            Ok(()) => {
                tracing::info!("Login accepted for '{}'", credentials.username);
                Ok(())
            }
            Err(message) => {
                tracing::warn!("Login rejected for '{}'", credentials.username);
                Err(Error::LoginRejected(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingVerifier {
        seen: Arc<Mutex<Vec<Credentials>>>,
        reply: std::result::Result<(), String>,
    }

    #[async_trait]
    impl CredentialVerifier for RecordingVerifier {
        async fn verify(&self, credentials: &Credentials) -> std::result::Result<(), String> {
            self.seen.lock().unwrap().push(credentials.clone());
            self.reply.clone()
        }
    }

    #[tokio::test]
    async fn test_gate_forwards_credentials_unvalidated() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let gate = LoginGate::new(Box::new(RecordingVerifier {
            seen: seen.clone(),
            reply: Ok(()),
        }));

        gate.submit("", "  ").await.unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].username, "");
        assert_eq!(seen[0].password, "  ");
    }

    #[tokio::test]
    async fn test_gate_surfaces_verifier_message_verbatim() {
        let gate = LoginGate::new(Box::new(RecordingVerifier {
            seen: Arc::new(Mutex::new(Vec::new())),
            reply: Err("Account locked, call support".to_string()),
        }));

        let err = gate.submit("ada", "pw").await.unwrap_err();
        assert!(matches!(err, Error::LoginRejected(_)));
        assert_eq!(err.to_string(), "Account locked, call support");
    }

    #[tokio::test(start_paused = true)]
    async fn test_gate_waits_simulated_latency() {
        let gate = LoginGate::new(Box::new(StaticCredentialVerifier::new(Credentials {
            username: "ada".to_string(),
            password: "pw".to_string(),
        })))
        .with_simulated_latency(Duration::from_millis(1500));

        let start = tokio::time::Instant::now();
        gate.submit("ada", "pw").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_static_verifier() {
        let verifier = StaticCredentialVerifier::new(Credentials {
            username: "ada".to_string(),
            password: "pw".to_string(),
        });

        assert!(verifier
            .verify(&Credentials {
                username: "ada".to_string(),
                password: "pw".to_string(),
            })
            .await
            .is_ok());
        assert_eq!(
            verifier
                .verify(&Credentials {
                    username: "ada".to_string(),
                    password: "nope".to_string(),
                })
                .await
                .unwrap_err(),
            "Invalid username or password."
        );
    }
}
