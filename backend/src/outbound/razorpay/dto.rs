//! DTOs for the gateway's order, refund and webhook JSON.
//!
//! The adapter decodes into these transport DTOs first, then maps into
//! domain records in one pass.

use serde::{Deserialize, Serialize};

use crate::domain::{GatewayEvent, GatewayOrder, GatewayRefund, Money, RefundStatus};

#[derive(Debug, Serialize)]
pub(super) struct CreateOrderDto<'a> {
    pub(super) amount: i64,
    pub(super) currency: &'a str,
    pub(super) receipt: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRefundDto {
    pub(super) amount: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct OrderDto {
    pub(super) id: String,
    pub(super) amount: i64,
    pub(super) currency: String,
}

impl OrderDto {
    pub(super) fn into_domain(self) -> Result<GatewayOrder, String> {
        let amount = Money::from_minor(self.amount)
            .ok_or_else(|| format!("order {} has negative amount {}", self.id, self.amount))?;
        Ok(GatewayOrder {
            order_id: self.id,
            amount,
            currency: self.currency,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RefundDto {
    pub(super) id: String,
    pub(super) amount: i64,
    #[serde(default)]
    pub(super) status: Option<String>,
}

impl RefundDto {
    pub(super) fn into_domain(self) -> Result<GatewayRefund, String> {
        let amount = Money::from_minor(self.amount)
            .ok_or_else(|| format!("refund {} has negative amount {}", self.id, self.amount))?;
        let status = match self.status.as_deref() {
            None => RefundStatus::Pending,
            Some(raw) => RefundStatus::parse(raw)
                .ok_or_else(|| format!("refund {} has unknown status {raw}", self.id))?,
        };
        Ok(GatewayRefund {
            refund_id: self.id,
            amount,
            status,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WebhookDto {
    pub(super) event: String,
    #[serde(default)]
    pub(super) payload: WebhookPayloadDto,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct WebhookPayloadDto {
    pub(super) payment: Option<EntityDto<PaymentEntityDto>>,
    pub(super) refund: Option<EntityDto<RefundEntityDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EntityDto<T> {
    pub(super) entity: T,
}

#[derive(Debug, Deserialize)]
pub(super) struct PaymentEntityDto {
    pub(super) id: String,
    pub(super) order_id: Option<String>,
    #[serde(default)]
    pub(super) error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RefundEntityDto {
    pub(super) id: String,
}

impl WebhookDto {
    pub(super) fn into_domain(self) -> Result<GatewayEvent, String> {
        match self.event.as_str() {
            "payment.captured" => {
                let (order_id, payment_id, _) = self.payment_entity()?;
                Ok(GatewayEvent::PaymentCaptured {
                    order_id,
                    payment_id,
                })
            }
            "payment.failed" => {
                let (order_id, payment_id, reason) = self.payment_entity()?;
                Ok(GatewayEvent::PaymentFailed {
                    order_id,
                    payment_id,
                    reason,
                })
            }
            "refund.processed" => Ok(GatewayEvent::RefundProcessed {
                refund_id: self.refund_id()?,
            }),
            "refund.failed" => Ok(GatewayEvent::RefundFailed {
                refund_id: self.refund_id()?,
            }),
            _ => Ok(GatewayEvent::Ignored { event: self.event }),
        }
    }

    fn payment_entity(self) -> Result<(String, String, Option<String>), String> {
        let event = self.event;
        let payment = self
            .payload
            .payment
            .ok_or_else(|| format!("{event} event has no payment entity"))?
            .entity;
        let order_id = payment
            .order_id
            .ok_or_else(|| format!("{event} payment {} has no order id", payment.id))?;
        Ok((order_id, payment.id, payment.error_description))
    }

    fn refund_id(self) -> Result<String, String> {
        let event = self.event;
        self.payload
            .refund
            .map(|refund| refund.entity.id)
            .ok_or_else(|| format!("{event} event has no refund entity"))
    }
}
