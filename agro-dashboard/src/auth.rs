//! Shared-passphrase gate.

/// Single shared passphrase. With none configured the gate stays closed.
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    passphrase: Option<String>,
}

impl AuthGate {
    pub fn new(passphrase: Option<String>) -> Self {
        Self {
            passphrase: passphrase.filter(|p| !p.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.passphrase.is_some()
    }

    pub fn check(&self, attempt: &str) -> bool {
        match &self.passphrase {
            None => false,
            Some(expected) => expected == attempt,
        }
    }
}
