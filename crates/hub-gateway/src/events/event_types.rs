//! Event types carried in Dispatch (op=0) messages

use std::fmt;
use std::str::FromStr;

/// Events the server pushes to connected clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayEventType {
    /// A chat message was delivered to a room the client joined
    ReceiveMessage,
    /// A send operation failed; delivered only to the caller
    ErrorMessage,
}

impl GatewayEventType {
    /// Get the wire name of this event
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReceiveMessage => "RECEIVE_MESSAGE",
            Self::ErrorMessage => "ERROR_MESSAGE",
        }
    }
}

impl FromStr for GatewayEventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVE_MESSAGE" => Ok(Self::ReceiveMessage),
            "ERROR_MESSAGE" => Ok(Self::ErrorMessage),
            _ => Err(()),
        }
    }
}

impl fmt::Display for GatewayEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(GatewayEventType::ReceiveMessage.as_str(), "RECEIVE_MESSAGE");
        assert_eq!(GatewayEventType::ErrorMessage.as_str(), "ERROR_MESSAGE");
    }

    #[test]
    fn test_event_type_from_str() {
        assert_eq!(
            "RECEIVE_MESSAGE".parse::<GatewayEventType>(),
            Ok(GatewayEventType::ReceiveMessage)
        );
        assert_eq!(
            "ERROR_MESSAGE".parse::<GatewayEventType>(),
            Ok(GatewayEventType::ErrorMessage)
        );
        assert!("UNKNOWN_EVENT".parse::<GatewayEventType>().is_err());
    }
}
