use serde::{Deserialize, Serialize};

/// The user's current wallet connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSession {
    pub address: Option<String>,
    pub is_connected: bool,
    pub is_connecting: bool,
}

impl WalletSession {
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Address in the `0x1234...abcd` form used for display.
    pub fn display_address(&self) -> Option<String> {
        self.address.as_deref().map(shorten_address)
    }
}

/// Shorten an address to its first 6 and last 4 characters.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSessionResponse {
    pub address: Option<String>,
    pub display_address: Option<String>,
    pub is_connected: bool,
    pub is_connecting: bool,
}

impl From<WalletSession> for WalletSessionResponse {
    fn from(session: WalletSession) -> Self {
        Self {
            display_address: session.display_address(),
            address: session.address,
            is_connected: session.is_connected,
            is_connecting: session.is_connecting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0x742d35Cc6634C0532925a3b844Bc454e4438f44e"),
            "0x742d...f44e"
        );
        assert_eq!(shorten_address("0xabc"), "0xabc");
    }

    #[test]
    fn test_session_response() {
        let session = WalletSession {
            address: Some("0x1234567890123456789012345678901234567890".to_string()),
            is_connected: true,
            is_connecting: false,
        };
        let response: WalletSessionResponse = session.into();
        assert_eq!(response.display_address.as_deref(), Some("0x1234...7890"));
        assert!(response.is_connected);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["displayAddress"], "0x1234...7890");
        assert_eq!(json["isConnected"], true);
        assert_eq!(json["isConnecting"], false);
        assert!(json.get("is_connected").is_none());
    }

    #[test]
    fn test_default_is_disconnected() {
        let session = WalletSession::disconnected();
        assert!(session.address.is_none());
        assert!(!session.is_connected);
        assert!(!session.is_connecting);
        assert!(session.display_address().is_none());
    }
}
