use super::*;

fn line(id: &str, price: i64, quantity: i32) -> LineItem {
    LineItem::new(id, id, Decimal::from(price), quantity)
}

#[test]
fn test_delivery_fee_constant() {
    assert_eq!(DELIVERY_FEE, Decimal::from(50));
    assert_eq!(delivery_fee(OrderType::Delivery), Decimal::from(50));
    assert_eq!(delivery_fee(OrderType::Pickup), Decimal::ZERO);
}

#[test]
fn test_compute_totals_delivery() {
    let lines = vec![line("A", 100, 2), line("B", 35, 1)];
    let totals = compute_totals(&lines, OrderType::Delivery);
    assert_eq!(totals.subtotal, Decimal::from(235));
    assert_eq!(totals.delivery_fee, Decimal::from(50));
    assert_eq!(totals.total, Decimal::from(285));
}

#[test]
fn test_compute_totals_pickup() {
    let lines = vec![line("A", 100, 2)];
    let totals = compute_totals(&lines, OrderType::Pickup);
    assert_eq!(totals.subtotal, Decimal::from(200));
    assert_eq!(totals.delivery_fee, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::from(200));
}

#[test]
fn test_empty_delivery_still_charges_fee() {
    let totals = compute_totals(&Vec::<LineItem>::new(), OrderType::Delivery);
    assert_eq!(totals.subtotal, Decimal::ZERO);
    assert_eq!(totals.total, Decimal::from(50));
}

#[test]
fn test_fractional_prices_stay_exact() {
    // 0.1 + 0.2 style drift must not leak into totals
    let lines = vec![
        LineItem::new("A", "A", Decimal::new(10, 2), 1),
        LineItem::new("B", "B", Decimal::new(20, 2), 1),
    ];
    let totals = compute_totals(&lines, OrderType::Pickup);
    assert_eq!(totals.total, Decimal::new(30, 2));
}

#[test]
fn test_accumulation_precision() {
    let lines: Vec<LineItem> = (0..1000)
        .map(|i| LineItem::new(format!("item-{i}"), "x", Decimal::new(1, 2), 1))
        .collect();
    assert_eq!(subtotal(&lines), Decimal::from(10));
}

#[test]
fn test_round_money_half_up() {
    assert_eq!(round_money(Decimal::new(1005, 3)), Decimal::new(101, 2));
    assert_eq!(round_money(Decimal::new(1004, 3)), Decimal::new(100, 2));
}

#[test]
fn test_parse_amount_accepts_common_input() {
    assert_eq!(parse_amount("200", "amount").unwrap(), Decimal::from(200));
    assert_eq!(parse_amount(" 199.5 ", "amount").unwrap(), Decimal::new(1995, 1));
    assert_eq!(parse_amount("1,250.00", "amount").unwrap(), Decimal::from(1250));
    assert_eq!(parse_amount("0", "amount").unwrap(), Decimal::ZERO);
}

#[test]
fn test_parse_amount_rejects_bad_input() {
    for input in ["", "   ", "abc", "-5", "12.3.4", "2000000"] {
        let err = parse_amount(input, "amount_tendered").unwrap_err();
        assert!(
            matches!(err, OrderError::Validation { field: "amount_tendered", .. }),
            "input {input:?} should be a validation error, got {err:?}"
        );
    }
}

#[test]
fn test_validate_unit_price_bounds() {
    assert!(validate_unit_price("A", Decimal::ZERO).is_ok());
    assert!(validate_unit_price("A", MAX_PRICE).is_ok());

    for price in [Decimal::from(-1), MAX_PRICE + Decimal::new(1, 2), Decimal::MAX] {
        let err = validate_unit_price("A", price).unwrap_err();
        assert!(
            matches!(err, OrderError::Validation { field: "unit_price", .. }),
            "price {price} should be rejected, got {err:?}"
        );
    }
}
