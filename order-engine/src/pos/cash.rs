//! Cash tender reconciliation
//!
//! Pure functions over a composed total and the amount staff typed in. Only
//! the cash method is checked here; card and online payments are verified
//! outside the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::Order;

use crate::order_money;
use crate::orders::{OrderError, OrderResult};

/// 找零 = max(0, 实收 - 应收), exact
pub fn compute_change(total: Decimal, amount_tendered: Decimal) -> Decimal {
    (amount_tendered - total).max(Decimal::ZERO)
}

/// Tender covers the total; a zero total is never payable
pub fn is_sufficient(total: Decimal, amount_tendered: Decimal) -> bool {
    total > Decimal::ZERO && amount_tendered >= total
}

/// A single cash payment attempt, for receipt printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashTender {
    pub amount_tendered: Decimal,
    pub total: Decimal,
    pub change: Decimal,
}

/// Check a tender against a total and compute change
pub fn tender_cash(total: Decimal, amount_tendered: Decimal) -> OrderResult<CashTender> {
    if !is_sufficient(total, amount_tendered) {
        tracing::warn!(%total, %amount_tendered, "Cash tender insufficient");
        return Err(OrderError::PaymentInsufficient {
            total,
            tendered: amount_tendered,
        });
    }
    Ok(CashTender {
        amount_tendered,
        total,
        change: compute_change(total, amount_tendered),
    })
}

/// Same as [`tender_cash`] with the amount as typed by staff
pub fn tender_cash_str(total: Decimal, amount_tendered: &str) -> OrderResult<CashTender> {
    let amount = order_money::parse_amount(amount_tendered, "amount_tendered")?;
    tender_cash(total, amount)
}

/// Gate an order for submission on its payment method
///
/// Cash orders need a sufficient tender (a missing tender counts as zero);
/// other methods pass with no tender. Returns the tender for cash orders.
pub fn validate_for_submission(
    order: &Order,
    amount_tendered: Option<Decimal>,
) -> OrderResult<Option<CashTender>> {
    if !order.payment_method.is_cash() {
        return Ok(None);
    }
    tender_cash(order.total, amount_tendered.unwrap_or(Decimal::ZERO)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderStatus, OrderType, PaymentMethod};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn order(total: i64, method: PaymentMethod) -> Order {
        Order {
            order_id: None,
            status: OrderStatus::Pending,
            order_type: OrderType::Delivery,
            customer_id: None,
            lines: vec![],
            item_states: vec![],
            delivery_address: None,
            customer_phone: None,
            payment_method: method,
            notes: None,
            table: None,
            subtotal: Decimal::from(total - 50),
            delivery_fee: Decimal::from(50),
            total: Decimal::from(total),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_compute_change_never_negative() {
        assert_eq!(compute_change(dec("250"), dec("300")), dec("50"));
        assert_eq!(compute_change(dec("250"), dec("250")), Decimal::ZERO);
        assert_eq!(compute_change(dec("250"), dec("200")), Decimal::ZERO);
        assert_eq!(compute_change(dec("99.95"), dec("100")), dec("0.05"));
        // sub-cent tenders are not rounded away
        assert_eq!(compute_change(dec("10"), dec("10.005")), dec("0.005"));
        assert_eq!(compute_change(dec("10.004"), dec("10.01")), dec("0.006"));
    }

    #[test]
    fn test_is_sufficient() {
        assert!(is_sufficient(dec("250"), dec("250")));
        assert!(is_sufficient(dec("250"), dec("300")));
        assert!(!is_sufficient(dec("250"), dec("200")));
        // empty order is never payable
        assert!(!is_sufficient(Decimal::ZERO, dec("10")));
        assert!(!is_sufficient(Decimal::ZERO, Decimal::ZERO));
    }

    #[test]
    fn test_cash_scenario() {
        let o = order(250, PaymentMethod::Cash);

        let tendered = order_money::parse_amount("200", "amount_tendered").unwrap();
        assert!(!is_sufficient(o.total, tendered));
        let err = validate_for_submission(&o, Some(tendered)).unwrap_err();
        assert_eq!(
            err,
            OrderError::PaymentInsufficient {
                total: dec("250"),
                tendered: dec("200"),
            }
        );

        let tendered = order_money::parse_amount("300", "amount_tendered").unwrap();
        let tender = validate_for_submission(&o, Some(tendered)).unwrap().unwrap();
        assert_eq!(tender.change, dec("50"));
        assert_eq!(tender.total, dec("250"));
    }

    #[test]
    fn test_cash_without_tender_is_insufficient() {
        let o = order(250, PaymentMethod::Cash);
        let err = validate_for_submission(&o, None).unwrap_err();
        assert!(matches!(err, OrderError::PaymentInsufficient { .. }));
    }

    #[test]
    fn test_non_cash_always_passes() {
        for method in [PaymentMethod::Card, PaymentMethod::Online] {
            let o = order(250, method);
            assert_eq!(validate_for_submission(&o, None).unwrap(), None);
            assert_eq!(validate_for_submission(&o, Some(Decimal::ZERO)).unwrap(), None);
        }
    }

    #[test]
    fn test_tender_cash_str() {
        let tender = tender_cash_str(dec("1249.50"), " 1,250 ").unwrap();
        assert_eq!(tender.change, dec("0.50"));

        let err = tender_cash_str(dec("10"), "ten").unwrap_err();
        assert!(matches!(err, OrderError::Validation { field: "amount_tendered", .. }));
    }
}
