//! # Session
//!
//! The one piece of state that outlives a single call: the connected wallet
//! account. Constructed on connect, dropped on disconnect or teardown, and
//! passed explicitly to whatever needs it.

use crate::bridge::Account;
use crate::config::display::{ADDRESS_DISPLAY_PREFIX, ADDRESS_DISPLAY_SUFFIX};

/// Connection-scoped context for the UI surface
#[derive(Debug, Clone)]
pub struct Session {
    account: Account,
}

impl Session {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn address(&self) -> &str {
        &self.account.address
    }

    /// Address with an ellipsis in the middle, e.g. `0x8fdc…6d47`
    pub fn short_address(&self) -> String {
        let address = self.address();
        if address.len() <= ADDRESS_DISPLAY_PREFIX + ADDRESS_DISPLAY_SUFFIX + 3 {
            address.to_string()
        } else {
            format!(
                "{}...{}",
                &address[..ADDRESS_DISPLAY_PREFIX],
                &address[address.len() - ADDRESS_DISPLAY_SUFFIX..]
            )
        }
    }

    /// Connection banner shown above the dashboard
    pub fn banner(&self) -> String {
        format!("Connected: {}", self.short_address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_address_ellipsis() {
        let session = Session::new(Account {
            address: "0x8fdc05f62b24f7e21c7f3e64666f4012813edeaf".to_string(),
        });
        assert_eq!(session.short_address(), "0x8fdc...deaf");
        assert_eq!(session.banner(), "Connected: 0x8fdc...deaf");
    }

    #[test]
    fn test_short_addresses_pass_through() {
        let session = Session::new(Account {
            address: "0xabc".to_string(),
        });
        assert_eq!(session.short_address(), "0xabc");
    }
}
