//! SMS message templates

use std::fmt;

use crate::domain::entities::OrderId;

/// Messages sent to customers and team members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationMessage {
    /// Delivery confirmation code; `order_id` is omitted for generic OTPs
    DeliveryOtp {
        order_id: Option<OrderId>,
        code: String,
        valid_minutes: i64,
    },
    /// Order accepted and being prepared
    OrderConfirmed { order_id: OrderId },
    /// Order handed over to the customer
    OrderDelivered { order_id: OrderId },
    /// Order assigned to a delivery team member
    TeamMemberAssigned { order_id: OrderId },
}

impl NotificationMessage {
    /// Order the message refers to
    pub fn order_id(&self) -> Option<&OrderId> {
        match self {
            NotificationMessage::DeliveryOtp { order_id, .. } => order_id.as_ref(),
            NotificationMessage::OrderConfirmed { order_id }
            | NotificationMessage::OrderDelivered { order_id }
            | NotificationMessage::TeamMemberAssigned { order_id } => Some(order_id),
        }
    }
}

impl fmt::Display for NotificationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationMessage::DeliveryOtp {
                order_id,
                code,
                valid_minutes,
            } => {
                let unit = if *valid_minutes == 1 { "minute" } else { "minutes" };
                match order_id {
                    Some(order_id) => write!(
                        f,
                        "Your Bite Me Buddy order #{} is out for delivery. OTP: {}. Valid for {} {}.",
                        order_id, code, valid_minutes, unit
                    ),
                    None => write!(
                        f,
                        "Your Bite Me Buddy OTP: {}. Valid for {} {}.",
                        code, valid_minutes, unit
                    ),
                }
            }
            NotificationMessage::OrderConfirmed { order_id } => write!(
                f,
                "Thank you for ordering with Bite Me Buddy! Your order #{} has been confirmed and is being prepared.",
                order_id
            ),
            NotificationMessage::OrderDelivered { order_id } => write!(
                f,
                "Your Bite Me Buddy order #{} has been delivered. Thank you for ordering with us!",
                order_id
            ),
            NotificationMessage::TeamMemberAssigned { order_id } => write!(
                f,
                "New order #{} has been assigned to you. Please check your dashboard for details.",
                order_id
            ),
        }
    }
}
