//! Inter-agent wire protocol
//!
//! Every message body is a closed tagged union discriminated by a `msg`
//! field, matched exhaustively by each recipient. The attack window is
//! protocol state: a spoofer learns whether the coordinator is attacking
//! only through the `QueryAttackTime`/`AttackTimeResponse` pair, never by
//! inspecting the coordinator directly.

use crate::models::order::Order;
use crate::models::AgentId;
use serde::{Deserialize, Serialize};

/// A message delivered asynchronously by the scheduling kernel.
///
/// Delivery order is preserved per destination; a reply is a new message,
/// never a return value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum Message {
    /// Ask a coordinator whether the attack window is currently open.
    QueryAttackTime {
        /// Agent to reply to
        sender: AgentId,
    },

    /// Coordinator's answer to [`Message::QueryAttackTime`].
    AttackTimeResponse {
        /// The coordinator that answered
        sender: AgentId,
        /// True while the coordinator is in its attacking state
        attack: bool,
    },

    /// The exchange filled one of the recipient's own orders.
    ///
    /// For a spoofer this is the signal that the layering invariant broke:
    /// the safety reflex withdraws everything that is still resting.
    OrderExecuted {
        /// The order as executed
        order: Order,
    },
}

impl Message {
    /// Short tag of the message kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::QueryAttackTime { .. } => "QueryAttackTime",
            Message::AttackTimeResponse { .. } => "AttackTimeResponse",
            Message::OrderExecuted { .. } => "OrderExecuted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::Side;

    #[test]
    fn test_msg_tag_round_trip() {
        let query = Message::QueryAttackTime { sender: 7 };
        let encoded = serde_json::to_string(&query).unwrap();
        assert!(encoded.contains("\"msg\":\"query_attack_time\""));
        assert_eq!(serde_json::from_str::<Message>(&encoded).unwrap(), query);
    }

    #[test]
    fn test_response_carries_attack_flag() {
        let reply = Message::AttackTimeResponse {
            sender: 1,
            attack: true,
        };
        let encoded = serde_json::to_string(&reply).unwrap();
        let decoded: Message = serde_json::from_str(&encoded).unwrap();
        match decoded {
            Message::AttackTimeResponse { attack, sender } => {
                assert!(attack);
                assert_eq!(sender, 1);
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_executed_order_round_trip() {
        let order = Order::new(
            "ord_00000003".to_string(),
            "IBM".to_string(),
            10_000,
            Side::Buy,
            99,
        )
        .unwrap();
        let note = Message::OrderExecuted {
            order: order.clone(),
        };
        let encoded = serde_json::to_string(&note).unwrap();
        match serde_json::from_str::<Message>(&encoded).unwrap() {
            Message::OrderExecuted { order: decoded } => assert_eq!(decoded, order),
            other => panic!("unexpected message {:?}", other),
        }
    }
}
